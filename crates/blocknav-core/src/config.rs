//! Configuration management for blocknav.
//!
//! Loads configuration from ${BLOCKNAV_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Key names bound to each navigation intent.
///
/// Names are arrow/special key names (`up`, `down`, `left`, `right`,
/// `enter`, `tab`, `backtab`) or single characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Backward within the run (previous category when collapsed).
    pub up: Vec<String>,
    /// Forward within the run (next category when collapsed).
    pub down: Vec<String>,
    /// Leave the run.
    pub collapse: Vec<String>,
    /// Enter the run.
    pub expand: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let names = |names: &[&str]| -> Vec<String> {
            names.iter().map(|n| (*n).to_string()).collect()
        };
        Self {
            up: names(&["up", "k"]),
            down: names(&["down", "j"]),
            collapse: names(&["left", "h"]),
            expand: names(&["right", "l"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    pub log_filter: String,
    pub keys: KeyBindings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: Self::DEFAULT_LOG_FILTER.to_string(),
            keys: KeyBindings::default(),
        }
    }
}

pub mod paths {
    //! Path resolution for blocknav configuration.
    //!
    //! BLOCKNAV_HOME resolution order:
    //! 1. BLOCKNAV_HOME environment variable (if set)
    //! 2. ~/.config/blocknav (default)

    use std::path::PathBuf;

    /// Returns the blocknav home directory.
    pub fn blocknav_home() -> PathBuf {
        if let Ok(home) = std::env::var("BLOCKNAV_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".blocknav"),
            |h| h.join(".config").join("blocknav"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        blocknav_home().join("config.toml")
    }
}

const CONFIG_HEADER: &str = "\
# blocknav configuration
#
# log_filter: tracing filter used when RUST_LOG is unset (e.g. \"debug\").
# [keys]: key names per navigation intent; arrow names or single characters.

";

impl Config {
    pub const DEFAULT_LOG_FILTER: &'static str = "warn";

    /// Loads configuration from the default path.
    /// Returns defaults if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Renders the default configuration as TOML.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn generate() -> Result<String> {
        let body = toml::to_string_pretty(&Config::default())
            .context("Failed to serialize default config")?;
        Ok(format!("{CONFIG_HEADER}{body}"))
    }

    /// Writes the default configuration to `path`.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, Self::generate()?)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }
}
