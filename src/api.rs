//! Request-level entry point.
//!
//! [`NearbyCore`] turns decoded form or query fields into the plain-text or
//! JSON replies callers expect. It does no routing and knows nothing about
//! sockets; the dispatch layer decodes requests into [`SignupForm`],
//! [`LoginForm`], [`PeopleQuery`] and [`PersonForm`] and writes back the
//! returned [`Reply`].
//!
//! Rejections caused by the request (bad input, duplicates, wrong
//! password) are `Ok` replies. Only fatal failures are `Err`, so the
//! dispatch layer can fail the request without leaking details.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::error;

use crate::config::{ConfigError, CoreConfig};
use crate::credential::{CredentialError, CredentialStore, Registration};
use crate::location::{Coordinates, LocationError, ProximityEngine, UpsertOutcome};
use crate::storage::{CredentialRepository, LocationRepository, SqliteStorage, StorageError};

/// Reply to a missing query coordinate.
pub const MISSING_PARAMETERS: &str = "Missing parameter(s).";

/// Error that fails a whole request.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration was unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Storage could not be opened.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Registration or login hit a fatal error.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// A location operation hit a fatal error.
    #[error(transparent)]
    Location(#[from] LocationError),

    /// A reply body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A reply ready to be written back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP-style status code.
    pub status: u16,
    /// MIME type of `body`.
    pub content_type: &'static str,
    /// Reply payload.
    pub body: String,
}

impl Reply {
    /// A `200` plain-text reply.
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
        }
    }

    /// A JSON reply with the given status.
    #[must_use]
    pub fn json(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "application/json",
            body,
        }
    }
}

/// Sign-up form fields. Absent fields decode as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    /// Requested user name.
    pub username: String,
    /// Requested email address.
    pub email: String,
    /// Candidate password.
    pub password: String,
    /// Repeated password.
    pub confirm: String,
}

/// Login form fields. Absent fields decode as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    /// Registered email address.
    pub email: String,
    /// Password to check.
    pub password: String,
}

/// Query string of a people lookup.
///
/// Longitude may be sent as `longitude` or `longtitude`. If both arrive,
/// `longitude` wins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawPeopleQuery")]
pub struct PeopleQuery {
    /// Latitude text.
    pub latitude: Option<String>,
    /// Longitude text.
    pub longitude: Option<String>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawPeopleQuery {
    latitude: Option<String>,
    longitude: Option<String>,
    longtitude: Option<String>,
}

impl From<RawPeopleQuery> for PeopleQuery {
    fn from(raw: RawPeopleQuery) -> Self {
        Self {
            latitude: raw.latitude,
            longitude: raw.longitude.or(raw.longtitude),
        }
    }
}

/// Form fields of a position update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonForm {
    /// Person's name.
    pub name: String,
    /// Longitude text.
    #[serde(rename = "longtitude", alias = "longitude")]
    pub longitude: String,
    /// Latitude text.
    pub latitude: String,
    /// `"true"` to append a new record, anything else to update.
    #[serde(rename = "newUser")]
    pub new_user: String,
}

/// Core interface for Nearby functionality.
///
/// Owns a [`CredentialStore`] and a [`ProximityEngine`] sharing one
/// storage handle. Safe to share across request threads when the storage
/// is.
///
/// # Examples
///
/// ```
/// use nearby_core::{NearbyCore, PeopleQuery, PersonForm, SignupForm};
/// use nearby_core::storage::SqliteStorage;
/// use std::sync::Arc;
///
/// let core = NearbyCore::with_storage(Arc::new(SqliteStorage::in_memory().unwrap()), 4);
///
/// let reply = core
///     .signup(&SignupForm {
///         username: "alice".into(),
///         email: "alice@example.com".into(),
///         password: "Abcdef1!".into(),
///         confirm: "Abcdef1!".into(),
///     })
///     .unwrap();
/// assert_eq!(reply.body, "Registration successful!");
///
/// core.update_person(&PersonForm {
///     name: "alice".into(),
///     latitude: "1.0".into(),
///     longitude: "2.0".into(),
///     new_user: "true".into(),
/// })
/// .unwrap();
///
/// let reply = core
///     .find_people(&PeopleQuery {
///         latitude: Some("1.0".into()),
///         longitude: Some("2.0".into()),
///     })
///     .unwrap();
/// assert_eq!(reply.status, 201);
/// assert_eq!(reply.body, r#"[{"name":"alice","longtitude":2.0,"latitude":1.0}]"#);
/// ```
pub struct NearbyCore<S: ?Sized = SqliteStorage> {
    credentials: CredentialStore<S>,
    locations: ProximityEngine<S>,
}

impl NearbyCore<SqliteStorage> {
    /// Opens the configured `SQLite` database, creating tables as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the database cannot be
    /// opened.
    pub fn open(config: &CoreConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let storage = SqliteStorage::new(&config.database_path)?;
        Ok(Self::with_storage(Arc::new(storage), config.hash_cost))
    }
}

impl<S: CredentialRepository + LocationRepository + ?Sized> NearbyCore<S> {
    /// Creates a core over an existing storage handle.
    #[must_use]
    pub fn with_storage(storage: Arc<S>, hash_cost: u32) -> Self {
        Self {
            credentials: CredentialStore::with_cost(Arc::clone(&storage), hash_cost),
            locations: ProximityEngine::new(storage),
        }
    }

    /// The credential store.
    #[must_use]
    pub const fn credentials(&self) -> &CredentialStore<S> {
        &self.credentials
    }

    /// The proximity engine.
    #[must_use]
    pub const fn locations(&self) -> &ProximityEngine<S> {
        &self.locations
    }

    /// Registers a user from sign-up form fields.
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal hashing or storage failures.
    pub fn signup(&self, form: &SignupForm) -> Result<Reply, CoreError> {
        let registration = Registration {
            username: &form.username,
            email: &form.email,
            password: &form.password,
            confirm_password: &form.confirm,
        };

        match self.credentials.register(&registration) {
            Ok(_) => Ok(Reply::text("Registration successful!")),
            Err(e) => credential_reply(e),
        }
    }

    /// Checks login form fields.
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal hashing or storage failures.
    pub fn login(&self, form: &LoginForm) -> Result<Reply, CoreError> {
        match self.credentials.authenticate(&form.email, &form.password) {
            Ok(_) => Ok(Reply::text("Login succesful!")),
            Err(e) => credential_reply(e),
        }
    }

    /// Lists people near the queried point as a JSON array with status 201.
    ///
    /// # Errors
    ///
    /// Returns an error only if storage fails or the reply cannot be
    /// serialized.
    pub fn find_people(&self, query: &PeopleQuery) -> Result<Reply, CoreError> {
        let at = match Coordinates::parse(query.latitude.as_deref(), query.longitude.as_deref()) {
            Ok(at) => at,
            Err(LocationError::MissingParameter(_)) => return Ok(Reply::text(MISSING_PARAMETERS)),
            Err(e) => return location_reply(e),
        };

        let people = match self.locations.query(at) {
            Ok(people) => people,
            Err(e) => return location_reply(e),
        };

        Ok(Reply::json(201, serde_json::to_string(&people)?))
    }

    /// Adds or moves a person from form fields.
    ///
    /// # Errors
    ///
    /// Returns an error only if storage fails.
    pub fn update_person(&self, form: &PersonForm) -> Result<Reply, CoreError> {
        let at = match Coordinates::parse(Some(form.latitude.as_str()), Some(form.longitude.as_str())) {
            Ok(at) => at,
            Err(e) => return location_reply(e),
        };

        match self.locations.upsert(&form.name, at, form.new_user == "true") {
            Ok(UpsertOutcome::Inserted) => Ok(Reply::text("New user added.")),
            Ok(UpsertOutcome::Updated(_)) => Ok(Reply::text("Existing user updated.")),
            Err(e) => location_reply(e),
        }
    }
}

fn credential_reply(err: CredentialError) -> Result<Reply, CoreError> {
    if err.is_fatal() {
        error!(error = %err, "Credential request failed");
        Err(err.into())
    } else {
        Ok(Reply::text(err.user_message()))
    }
}

fn location_reply(err: LocationError) -> Result<Reply, CoreError> {
    if err.is_fatal() {
        error!(error = %err, "Location request failed");
        Err(err.into())
    } else {
        Ok(Reply::text(err.to_string()))
    }
}
