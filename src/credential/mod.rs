//! Credential lifecycle: password policy, registration and login.
//!
//! # Architecture
//!
//! ```text
//! CredentialStore (register / authenticate)
//!     ├── validate_password (strength policy, no I/O)
//!     └── CredentialRepository (persistence collaborator)
//! ```
//!
//! Passwords are hashed with bcrypt at a fixed cost
//! ([`DEFAULT_HASH_COST`] unless configured) and only the hash is stored.
//!
//! # Types
//!
//! - [`Credential`]: a registered username/email/hash triple
//! - [`Registration`]: sign-up input
//! - [`PolicyError`]: every password rule a candidate failed

mod error;
mod policy;
mod store;
pub mod types;

pub use error::{CredentialError, Result};
pub use policy::{
    validate_password, PolicyError, PolicyViolation, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
pub use store::CredentialStore;
pub use types::{Credential, Registration, DEFAULT_HASH_COST};
