//! In-memory storage for tests.
//!
//! Mirrors [`super::SqliteStorage`] semantics, including uniqueness
//! conflicts on insert, without touching disk.

use std::sync::{Mutex, MutexGuard};

use super::error::{Result, StorageError, UniqueField};
use super::{CredentialRepository, LocationRepository};
use crate::credential::Credential;
use crate::location::{Coordinates, LocationRecord};

/// Volatile storage backed by two vectors.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    credentials: Mutex<Vec<Credential>>,
    people: Mutex<Vec<LocationRecord>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|e| StorageError::Storage(format!("Failed to acquire memory lock: {e}")))
}

impl MemoryStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn credential_count(&self) -> Result<usize> {
        Ok(lock(&self.credentials)?.len())
    }
}

impl CredentialRepository for MemoryStorage {
    fn find_credential_by_email(&self, email: &str) -> Result<Option<Credential>> {
        Ok(lock(&self.credentials)?
            .iter()
            .find(|c| c.email == email)
            .cloned())
    }

    fn find_credential_by_username(&self, username: &str) -> Result<Option<Credential>> {
        Ok(lock(&self.credentials)?
            .iter()
            .find(|c| c.username == username)
            .cloned())
    }

    fn insert_credential(&self, credential: &Credential) -> Result<()> {
        let mut credentials = lock(&self.credentials)?;

        if credentials.iter().any(|c| c.email == credential.email) {
            return Err(StorageError::Conflict(UniqueField::Email));
        }
        if credentials.iter().any(|c| c.username == credential.username) {
            return Err(StorageError::Conflict(UniqueField::Username));
        }

        credentials.push(credential.clone());
        Ok(())
    }
}

impl LocationRepository for MemoryStorage {
    fn list_location_records(&self) -> Result<Vec<LocationRecord>> {
        Ok(lock(&self.people)?.clone())
    }

    fn insert_location_record(&self, record: &LocationRecord) -> Result<()> {
        lock(&self.people)?.push(record.clone());
        Ok(())
    }

    fn update_location_records_by_name(
        &self,
        name: &str,
        coordinates: Coordinates,
    ) -> Result<usize> {
        let mut people = lock(&self.people)?;
        let mut updated = 0;

        for record in people.iter_mut().filter(|r| r.name == name) {
            record.latitude = coordinates.latitude();
            record.longitude = coordinates.longitude();
            updated += 1;
        }

        Ok(updated)
    }
}
