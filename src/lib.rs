//! Vehicle Sale Deed
//!
//! Collects the seller, buyer, vehicle, price and witness details of a
//! private vehicle sale step by step, keeps the draft on disk between runs,
//! and renders the finished sale deed as a printable PDF or HTML page.

pub mod cli;
pub mod core;
pub mod entities;
pub mod schema;
