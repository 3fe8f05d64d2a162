//! # Store Configuration
//!
//! Where the pricing tables live and how they are written.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CAPQUOTE_TABLE_DIR=/srv/capquote/tables                            │
//! │     CAPQUOTE_PRETTY_JSON=true                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/capquote/capquote.toml (Linux)                           │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     platform data dir /tables, falling back to ./tables                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # capquote.toml
//! [tables]
//! dir = "/srv/capquote/tables"
//! pretty = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

pub const ENV_TABLE_DIR: &str = "CAPQUOTE_TABLE_DIR";
pub const ENV_PRETTY_JSON: &str = "CAPQUOTE_PRETTY_JSON";

const CONFIG_FILE_NAME: &str = "capquote.toml";

// =============================================================================
// Table Settings
// =============================================================================

/// Location and formatting of the table files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSettings {
    /// Directory holding `tiers.json`, `shrouds.json`, and the rest.
    #[serde(default = "default_table_dir")]
    pub dir: PathBuf,

    /// Write indented JSON so admins can diff edits.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_table_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "capquote", "capquote")
        .map(|dirs| dirs.data_dir().join("tables"))
        .unwrap_or_else(|| PathBuf::from("tables"))
}

fn default_pretty() -> bool {
    true
}

impl Default for TableSettings {
    fn default() -> Self {
        TableSettings {
            dir: default_table_dir(),
            pretty: default_pretty(),
        }
    }
}

// =============================================================================
// Main Store Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub tables: TableSettings,
}

impl StoreConfig {
    /// Config with every table file under `dir`.
    pub fn with_table_dir(dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            tables: TableSettings {
                dir: dir.into(),
                ..TableSettings::default()
            },
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (capquote.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| StoreError::ConfigLoadFailed(format!("{}: {e}", path.display())))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Store config saved");
        Ok(())
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.tables.dir.as_os_str().is_empty() {
            return Err(StoreError::InvalidConfig("tables.dir must not be empty".into()));
        }
        Ok(())
    }

    /// Applies `CAPQUOTE_*` overrides from `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(ENV_TABLE_DIR) {
            debug!(dir = %dir, "Overriding table directory from environment");
            self.tables.dir = PathBuf::from(dir);
        }

        if let Some(pretty) = lookup(ENV_PRETTY_JSON) {
            match pretty.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.tables.pretty = true,
                "0" | "false" | "no" => self.tables.pretty = false,
                _ => warn!(value = %pretty, "Unknown {} value in environment", ENV_PRETTY_JSON),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "capquote", "capquote")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn table_dir(&self) -> &std::path::Path {
        &self.tables.dir
    }
}
