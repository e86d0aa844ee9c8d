//! Error types for credential operations.
//!
//! Validation, conflict, not-found and rejection errors describe the
//! caller's request and carry the message shown to them. Hashing and
//! storage errors are fatal for the request and are never shown.

use thiserror::Error;

use super::policy::PolicyError;
use crate::storage::StorageError;

/// Error type for registration and authentication.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// A required field was empty.
    #[error("Empty data.")]
    EmptyField,

    /// Password and confirmation differ.
    #[error("Password information must be the same.")]
    PasswordMismatch,

    /// The password failed the strength policy.
    #[error("{0}")]
    Policy(#[from] PolicyError),

    /// The email is already registered.
    #[error("There is already an account associated with that email.")]
    EmailTaken,

    /// The username is already registered.
    #[error("Username already exists.")]
    UsernameTaken,

    /// No credential is registered with the email.
    #[error("User not found.")]
    NotFound,

    /// The password did not match the stored hash.
    #[error("Login failed.")]
    InvalidPassword,

    /// bcrypt failed to hash or verify.
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// The persistence layer failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CredentialError {
    /// Returns `true` for errors that must fail the whole request.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Hashing(_) | Self::Storage(_))
    }

    /// Returns the message safe to show the caller.
    ///
    /// Fatal errors collapse to a generic message so no internal detail
    /// leaks.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.is_fatal() {
            "Internal error.".to_string()
        } else {
            self.to_string()
        }
    }
}

/// Result type alias for credential operations.
pub type Result<T> = std::result::Result<T, CredentialError>;
