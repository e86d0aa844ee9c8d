//! Error types for location operations.

use thiserror::Error;

use crate::storage::StorageError;

/// Error type for proximity queries and position updates.
#[derive(Error, Debug)]
pub enum LocationError {
    /// A required request parameter was absent or empty.
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    /// A coordinate could not be parsed as a number.
    #[error("Invalid {field}: {value:?} is not a number")]
    InvalidCoordinate {
        /// Which coordinate failed.
        field: &'static str,
        /// The text that was supplied.
        value: String,
    },

    /// A coordinate was outside its valid range or not finite.
    #[error("Invalid {field}: {value} is out of range")]
    OutOfRange {
        /// Which coordinate failed.
        field: &'static str,
        /// The parsed value.
        value: f64,
    },

    /// The persistence layer failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LocationError {
    /// Returns `true` for errors that must fail the whole request.
    ///
    /// Everything except storage failures is caused by the caller's input.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Result type alias for location operations.
pub type Result<T> = std::result::Result<T, LocationError>;
