//! Optional TOML settings file.
//!
//! ```toml
//! rate_table = "rates/sc_max_rates.csv"
//! log_level = "debug"
//! log_file = "comp-cli.log"
//! ```
//!
//! Every key is optional. Command line flags take precedence.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// CSV file replacing the built-in rate table.
    pub rate_table: Option<PathBuf>,
    /// `EnvFilter` directive, e.g. `"info"` or `"comp_core=debug"`.
    pub log_level: Option<String>,
    /// File that log records are appended to.
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Fills each setting from `overrides` when it is set there.
    pub fn merge(
        self,
        overrides: Settings,
    ) -> Settings {
        Settings {
            rate_table: overrides.rate_table.or(self.rate_table),
            log_level: overrides.log_level.or(self.log_level),
            log_file: overrides.log_file.or(self.log_file),
        }
    }
}
