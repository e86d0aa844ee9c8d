//! Error types for the persistence layer.

use std::fmt;

use thiserror::Error;

/// A column whose uniqueness is enforced by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    /// `users.email`
    Email,
    /// `users.username`
    Username,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("email"),
            Self::Username => f.write_str("username"),
        }
    }
}

/// Error type for storage operations.
///
/// A lookup that matches no row is not an error; repositories return
/// `Ok(None)` for it.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database error from `SQLite`.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An insert collided with an existing unique value.
    #[error("Duplicate {0}")]
    Conflict(UniqueField),
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_display() {
        let err = StorageError::Storage("test error".to_string());
        assert_eq!(err.to_string(), "Storage error: test error");
    }

    #[test]
    fn conflict_error_display() {
        assert_eq!(
            StorageError::Conflict(UniqueField::Email).to_string(),
            "Duplicate email"
        );
        assert_eq!(
            StorageError::Conflict(UniqueField::Username).to_string(),
            "Duplicate username"
        );
    }

    #[test]
    fn database_error_converts() {
        let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(err.to_string().starts_with("Database error:"));
    }
}
