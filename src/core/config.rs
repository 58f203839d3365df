//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::core::draft::FileDraftStore;

pub const DEFAULT_PRINT_COMMAND: &str = "lp";

/// Deed tool configuration with layered hierarchy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Location of the draft file
    pub draft_path: Option<PathBuf>,

    /// Default directory for exported files
    pub output_dir: Option<PathBuf>,

    /// Host command that prints a file, e.g. "lp -d office"
    pub print_command: Option<String>,

    /// Default recipient for the mail link
    pub mail_to: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let file = Self::config_file_path();
        Self::load_from(file.as_deref(), |key| std::env::var(key).ok())
    }

    /// Config file in use: `DEED_CONFIG`, else the global file
    pub fn config_file_path() -> Option<PathBuf> {
        std::env::var_os("DEED_CONFIG")
            .map(PathBuf::from)
            .or_else(Self::global_config_path)
    }

    /// Load from an explicit config file and environment lookup
    pub fn load_from(file: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Self {
        // 1. Built-in defaults (already in Default impl)
        let mut config = Config::default();

        // 2. Config file
        if let Some(path) = file {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match serde_yml::from_str::<Config>(&contents) {
                        Ok(file_config) => config.merge(file_config),
                        Err(e) => warn!(path = %path.display(), error = %e, "ignoring unreadable config"),
                    },
                    Err(e) => warn!(path = %path.display(), error = %e, "ignoring unreadable config"),
                }
            }
        }

        // 3. Environment variables
        if let Some(path) = env("DEED_DRAFT_PATH").filter(|v| !v.is_empty()) {
            config.draft_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = env("DEED_OUTPUT_DIR").filter(|v| !v.is_empty()) {
            config.output_dir = Some(PathBuf::from(dir));
        }
        if let Some(cmd) = env("DEED_PRINT_COMMAND").filter(|v| !v.is_empty()) {
            config.print_command = Some(cmd);
        }

        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "vehicle-sale-deed")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.draft_path.is_some() {
            self.draft_path = other.draft_path;
        }
        if other.output_dir.is_some() {
            self.output_dir = other.output_dir;
        }
        if other.print_command.is_some() {
            self.print_command = other.print_command;
        }
        if other.mail_to.is_some() {
            self.mail_to = other.mail_to;
        }
    }

    /// Effective draft file, falling back to the user data directory
    pub fn draft_path(&self) -> PathBuf {
        self.draft_path
            .clone()
            .or_else(FileDraftStore::default_path)
            .unwrap_or_else(|| PathBuf::from(format!("{}.json", crate::core::draft::STORAGE_KEY)))
    }

    /// Effective export directory, falling back to the working directory
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn print_command(&self) -> String {
        self.print_command
            .clone()
            .unwrap_or_else(|| DEFAULT_PRINT_COMMAND.to_string())
    }
}
