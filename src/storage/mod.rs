//! Persistence for credentials and location records.
//!
//! The credential store and the proximity engine never talk to a database
//! directly. They are handed a repository implementing the traits below,
//! which keeps them testable against [`MemoryStorage`] and lets one shared
//! [`SqliteStorage`] handle serve many concurrent requests.
//!
//! # Architecture
//!
//! ```text
//! CredentialStore ──► CredentialRepository ─┐
//!                                           ├── SqliteStorage (users, people)
//! ProximityEngine ──► LocationRepository ───┘
//! ```
//!
//! Each call is a single atomic statement. Uniqueness of usernames and
//! emails is enforced by the storage itself, so two racing registrations
//! cannot both succeed: the loser gets [`StorageError::Conflict`].

mod error;
#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod sqlite;

pub use error::{Result, StorageError, UniqueField};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use crate::credential::Credential;
use crate::location::{Coordinates, LocationRecord};

/// Read/write contract for registered credentials.
pub trait CredentialRepository: Send + Sync {
    /// Looks up the credential registered with `email`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend fails; no match is `Ok(None)`.
    fn find_credential_by_email(&self, email: &str) -> Result<Option<Credential>>;

    /// Looks up the credential registered with `username`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend fails; no match is `Ok(None)`.
    fn find_credential_by_username(&self, username: &str) -> Result<Option<Credential>>;

    /// Persists a new credential.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Conflict`] if the email or username is
    /// already taken, or another error if the backend fails.
    fn insert_credential(&self, credential: &Credential) -> Result<()>;
}

/// Read/write contract for location records.
pub trait LocationRepository: Send + Sync {
    /// Returns every record in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn list_location_records(&self) -> Result<Vec<LocationRecord>>;

    /// Appends a record. Duplicate names are allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn insert_location_record(&self, record: &LocationRecord) -> Result<()>;

    /// Moves every record called `name` to `coordinates`.
    ///
    /// Returns the number of records updated; zero is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn update_location_records_by_name(&self, name: &str, coordinates: Coordinates)
        -> Result<usize>;
}
