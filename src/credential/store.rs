//! Registration and authentication of credentials.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::{CredentialError, Result};
use super::policy::validate_password;
use super::types::{Credential, Registration, DEFAULT_HASH_COST};
use crate::storage::{CredentialRepository, StorageError, UniqueField};

/// Registers and authenticates users against a [`CredentialRepository`].
///
/// Holds no state besides the repository handle and the bcrypt cost, so a
/// single store can serve concurrent requests.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use nearby_core::credential::{CredentialStore, Registration};
/// use nearby_core::storage::SqliteStorage;
///
/// let storage = Arc::new(SqliteStorage::in_memory().unwrap());
/// let store = CredentialStore::with_cost(storage, 4);
///
/// store
///     .register(&Registration {
///         username: "alice",
///         email: "alice@example.com",
///         password: "Abcdef1!",
///         confirm_password: "Abcdef1!",
///     })
///     .unwrap();
///
/// assert!(store.authenticate("alice@example.com", "Abcdef1!").is_ok());
/// ```
pub struct CredentialStore<S: ?Sized> {
    storage: Arc<S>,
    cost: u32,
}

impl<S: CredentialRepository + ?Sized> CredentialStore<S> {
    /// Creates a store hashing with [`DEFAULT_HASH_COST`].
    #[must_use]
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_cost(storage, DEFAULT_HASH_COST)
    }

    /// Creates a store hashing with the given bcrypt cost.
    ///
    /// bcrypt accepts costs from 4 to 31; anything else makes
    /// [`register`](Self::register) fail with [`CredentialError::Hashing`].
    #[must_use]
    pub fn with_cost(storage: Arc<S>, cost: u32) -> Self {
        Self { storage, cost }
    }

    /// The bcrypt cost used for new hashes.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Registers a new user.
    ///
    /// Checks run in order and stop at the first failure: empty fields,
    /// password confirmation, password policy, email taken, username
    /// taken. Nothing is written unless every check passes.
    ///
    /// # Errors
    ///
    /// Returns the first failed check as a [`CredentialError`]. If another
    /// registration claims the email or username between the checks and
    /// the insert, storage rejects the insert and the same conflict error
    /// is returned.
    pub fn register(&self, registration: &Registration<'_>) -> Result<Credential> {
        let Registration {
            username,
            email,
            password,
            confirm_password,
        } = *registration;

        if [username, email, password, confirm_password]
            .iter()
            .any(|field| field.is_empty())
        {
            return Err(CredentialError::EmptyField);
        }

        if password != confirm_password {
            return Err(CredentialError::PasswordMismatch);
        }

        validate_password(password)?;

        if self.storage.find_credential_by_email(email)?.is_some() {
            return Err(CredentialError::EmailTaken);
        }

        if self.storage.find_credential_by_username(username)?.is_some() {
            return Err(CredentialError::UsernameTaken);
        }

        let password_hash = bcrypt::hash(password, self.cost)?;
        let credential = Credential::new(username, email, password_hash);

        match self.storage.insert_credential(&credential) {
            Ok(()) => {}
            Err(StorageError::Conflict(field)) => {
                warn!(username, %field, "Registration lost a uniqueness race");
                return Err(match field {
                    UniqueField::Email => CredentialError::EmailTaken,
                    UniqueField::Username => CredentialError::UsernameTaken,
                });
            }
            Err(e) => return Err(e.into()),
        }

        info!(username, "Registered new credential");
        Ok(credential)
    }

    /// Checks `password` against the credential registered for `email`.
    ///
    /// The comparison is bcrypt's own salt-aware verification.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::EmptyField`] for empty input,
    /// [`CredentialError::NotFound`] if no credential has this email,
    /// [`CredentialError::InvalidPassword`] if the password is wrong, and a
    /// fatal error if storage fails or the stored hash is malformed.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Credential> {
        if email.is_empty() || password.is_empty() {
            return Err(CredentialError::EmptyField);
        }

        let Some(credential) = self.storage.find_credential_by_email(email)? else {
            debug!("Login for unknown email");
            return Err(CredentialError::NotFound);
        };

        if bcrypt::verify(password, &credential.password_hash)? {
            debug!(username = %credential.username, "Login succeeded");
            Ok(credential)
        } else {
            debug!(username = %credential.username, "Login rejected");
            Err(CredentialError::InvalidPassword)
        }
    }
}
