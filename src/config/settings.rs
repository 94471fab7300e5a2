//! Presentation settings loading from config.toml
//!
//! Knobs that shape replies rather than behavior: how many leaderboard rows
//! to show and how many recent channel switches to pull into a stats reply.
//! The file is optional; a missing config.toml yields the defaults.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

const fn default_leaderboard_size() -> usize {
    10
}

const fn default_recent_switches() -> u64 {
    5
}

/// Settings structure representing the config.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Number of rows shown by the leaderboard command
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
    /// Number of recent channel switches included in a stats reply
    #[serde(default = "default_recent_switches")]
    pub recent_switches: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            leaderboard_size: default_leaderboard_size(),
            recent_switches: default_recent_switches(),
        }
    }
}

/// Loads settings from a TOML file, returning defaults when the file does
/// not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read settings file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from the default location (./config.toml).
pub fn load_default_settings() -> Result<Settings> {
    load_settings("config.toml")
}
