//! Credential data types.

use std::fmt;

/// Default bcrypt cost factor used when hashing passwords.
///
/// Matches the default cost of the reference bcrypt implementations
/// (2^10 rounds). Override through [`crate::config::CoreConfig`].
pub const DEFAULT_HASH_COST: u32 = 10;

/// A registered user's identity.
///
/// `username` and `email` are each unique across all credentials. The
/// password is only ever held as a salted bcrypt hash.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Unique, non-empty user name.
    pub username: String,

    /// Unique, non-empty email address.
    pub email: String,

    /// bcrypt hash in modular crypt format (`$2b$<cost>$...`).
    pub password_hash: String,
}

impl Credential {
    /// Creates a credential from an already-hashed password.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}

// The hash is redacted so credentials can be logged with `{:?}`.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Input for [`crate::credential::CredentialStore::register`].
#[derive(Debug, Clone, Copy)]
pub struct Registration<'a> {
    /// Requested user name.
    pub username: &'a str,
    /// Requested email address.
    pub email: &'a str,
    /// Candidate password.
    pub password: &'a str,
    /// Repeated password, must equal `password`.
    pub confirm_password: &'a str,
}
