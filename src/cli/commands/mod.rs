//! CLI command implementations

pub mod check;
pub mod completions;
pub mod config;
pub mod draft;
pub mod export;
pub mod mail;
pub mod preview;
pub mod print;
pub mod set;
pub mod start;
pub mod steps;
