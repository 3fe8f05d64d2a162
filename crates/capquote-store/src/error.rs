//! # Store Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Table Files   │  │     Admin Edits         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Io             │  │  InvalidValue           │ │
//! │  │  ConfigLoad…    │  │  Parse          │  │  NotFound               │ │
//! │  │  ConfigSave…    │  │  Serialize      │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Any failure while building a snapshot becomes                          │
//! │  CoreError::SnapshotUnavailable for the pricing engine.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use capquote_core::CoreError;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Table File Errors
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A table file exists but is not valid JSON for its table.
    #[error("Failed to parse {table}: {source}")]
    Parse {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize {table}: {source}")]
    Serialize {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    // =========================================================================
    // Admin Edit Errors
    // =========================================================================
    /// An edit carried a value no table may hold.
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// An edit targeted a key the table does not have.
    #[error("{table} has no entry '{key}'")]
    NotFound { table: String, key: String },
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::ConfigSaveFailed(err.to_string())
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        CoreError::SnapshotUnavailable(err.to_string())
    }
}

impl StoreError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidConfig(_) | StoreError::ConfigLoadFailed(_) | StoreError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StoreError::NotFound {
            table: "tiers".into(),
            key: "platinum".into(),
        };
        assert_eq!(err.to_string(), "tiers has no entry 'platinum'");
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_converts_to_snapshot_unavailable() {
        let source = serde_json::from_str::<u32>("{").unwrap_err();
        let err = StoreError::Parse {
            table: "tiers.json".into(),
            source,
        };
        let core: CoreError = err.into();
        match core {
            CoreError::SnapshotUnavailable(msg) => assert!(msg.starts_with("Failed to parse tiers.json")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
