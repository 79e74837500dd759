//! Category table and report location configuration.
//!
//! Configuration is stored in TOML format. The `[categories]` table lists
//! category folder names with the extensions they claim, in the order the
//! organizer should check them; `report_path` names the directory JSON
//! action reports are written to.
//!
//! # Configuration File Format
//!
//! ```toml
//! report_path = "reports"
//!
//! [categories]
//! Images = [".jpg", ".png", ".jpeg"]
//! Documents = [".pdf", ".docx", ".xlsx"]
//! Audio = [".mp3", ".wav"]
//! ```

use crate::category::CategoryTable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration.
///
/// An absent or empty `[categories]` table means the built-in defaults
/// apply; see [`CategoryTable::new`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory that action reports are written into.
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    /// Category folder names mapped to the extensions they claim,
    /// checked in file order.
    #[serde(default)]
    pub categories: IndexMap<String, Vec<String>>,
}

fn default_report_path() -> PathBuf {
    PathBuf::from("reports")
}

impl Config {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.fileflowrc.toml` in the current directory
    /// 3. Look for `~/.config/fileflow/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error only when a configuration file is explicitly
    /// provided but cannot be read, or when a discovered file fails to
    /// parse. A missing cascade file is not an error.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".fileflowrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("fileflow")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if the file cannot be read.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Builds the category table this configuration describes.
    ///
    /// An empty `categories` map yields the built-in default table.
    pub fn category_table(&self) -> CategoryTable {
        if self.categories.is_empty() {
            CategoryTable::new()
        } else {
            CategoryTable::from_map(self.categories.clone())
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
            categories: IndexMap::new(),
        }
    }
}
