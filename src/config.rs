//! Runtime configuration.
//!
//! Configuration is a small JSON document. Every field is optional and
//! falls back to its default:
//!
//! ```json
//! { "database_path": "database.db", "hash_cost": 10 }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::credential::DEFAULT_HASH_COST;

/// Lowest bcrypt cost accepted.
pub const MIN_HASH_COST: u32 = 4;

/// Highest bcrypt cost accepted.
pub const MAX_HASH_COST: u32 = 31;

/// Error type for loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON for [`CoreConfig`].
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its allowed range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for [`crate::NearbyCore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// `SQLite` database file, created if missing.
    pub database_path: PathBuf,

    /// bcrypt cost factor for new password hashes (4-31).
    pub hash_cost: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("database.db"),
            hash_cost: DEFAULT_HASH_COST,
        }
    }
}

impl CoreConfig {
    /// Parses and validates configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty database path or a
    /// hash cost outside `MIN_HASH_COST..=MAX_HASH_COST`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database_path is empty".to_string()));
        }
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&self.hash_cost) {
            return Err(ConfigError::Invalid(format!(
                "hash_cost {} is outside {MIN_HASH_COST}-{MAX_HASH_COST}",
                self.hash_cost
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CoreConfig::default();
        assert_eq!(config.database_path, PathBuf::from("database.db"));
        assert_eq!(config.hash_cost, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_uses_defaults() {
        assert_eq!(CoreConfig::from_json("{}").unwrap(), CoreConfig::default());
    }

    #[test]
    fn partial_document_overrides_fields() {
        let config = CoreConfig::from_json(r#"{"hash_cost": 12}"#).unwrap();
        assert_eq!(config.hash_cost, 12);
        assert_eq!(config.database_path, PathBuf::from("database.db"));
    }

    #[test]
    fn rejects_cost_out_of_range() {
        for json in [r#"{"hash_cost": 3}"#, r#"{"hash_cost": 32}"#] {
            let err = CoreConfig::from_json(json).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{json}");
        }
    }

    #[test]
    fn rejects_empty_database_path() {
        let err = CoreConfig::from_json(r#"{"database_path": ""}"#).unwrap_err();
        assert_eq!(err.to_string(), "Invalid config: database_path is empty");
    }

    #[test]
    fn rejects_malformed_json() {
        let err = CoreConfig::from_json("{hash_cost").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nearby.json");
        std::fs::write(&path, r#"{"database_path": "/tmp/people.db", "hash_cost": 4}"#).unwrap();

        let config = CoreConfig::from_file(&path).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/people.db"));
        assert_eq!(config.hash_cost, 4);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CoreConfig::from_file(Path::new("/nonexistent/nearby.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
