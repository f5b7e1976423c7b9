//! Compiler configuration.
//!
//! Loaded from TOML; every field has a default so an empty file is valid:
//!
//! ```toml
//! allow_redefine_macros = true
//! allow_redefine_functions = false
//! entry = "entry"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether a macro name may be bound again.
    pub allow_redefine_macros: bool,
    /// Whether a function name may be bound again.
    pub allow_redefine_functions: bool,
    /// Name of the routine each run is wrapped in.
    pub entry: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            allow_redefine_macros: true,
            allow_redefine_functions: false,
            entry: "entry".to_string(),
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
