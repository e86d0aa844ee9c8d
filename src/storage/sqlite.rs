//! `SQLite` storage for credentials and location records.
//!
//! Two tables are kept: `users` for registered credentials and `people`
//! for named positions. The tables are independent; a person's name is
//! not a reference to a user.

// SQLite operations need to hold the lock for the duration of the operation.
// Dropping the guard earlier would require restructuring all methods.
#![allow(clippy::significant_drop_tightening)]

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::error::{Result, StorageError, UniqueField};
use super::{CredentialRepository, LocationRepository};
use crate::credential::Credential;
use crate::location::{Coordinates, LocationRecord};

/// `SQLite`-based storage for credentials and location records.
///
/// Thread-safe wrapper around a `SQLite` connection. One instance is meant
/// to be shared (behind an `Arc`) by every in-flight request.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Creates a new storage instance at the given path.
    ///
    /// Creates the database file and tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created or initialized.
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.initialize_schema()?;
        debug!(path = %path.display(), "Opened SQLite storage");
        Ok(storage)
    }

    /// Creates an in-memory storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Storage(format!("Failed to acquire database lock: {e}")))
    }

    /// Initializes the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r"
            -- Registered credentials; uniqueness closes the registration race
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL
            );

            -- Named positions; names may repeat
            CREATE TABLE IF NOT EXISTS people (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                longitude REAL NOT NULL,
                latitude REAL NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_people_name ON people(name);
            ",
        )?;

        Ok(())
    }

    /// Returns the number of registered credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn credential_count(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| StorageError::Storage(format!("Invalid row count: {count}")))
    }

    fn find_credential(&self, column: &'static str, value: &str) -> Result<Option<Credential>> {
        let conn = self.lock()?;

        let sql = format!("SELECT username, email, password_hash FROM users WHERE {column} = ?1");
        let credential = conn
            .query_row(&sql, params![value], |row| {
                Ok(Credential {
                    username: row.get(0)?,
                    email: row.get(1)?,
                    password_hash: row.get(2)?,
                })
            })
            .optional()?;

        Ok(credential)
    }
}

/// Maps a UNIQUE constraint failure to the column that caused it.
fn unique_violation(err: &rusqlite::Error) -> Option<UniqueField> {
    match err {
        rusqlite::Error::SqliteFailure(failure, Some(message))
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            if message.contains("users.email") {
                Some(UniqueField::Email)
            } else if message.contains("users.username") {
                Some(UniqueField::Username)
            } else {
                None
            }
        }
        _ => None,
    }
}

impl CredentialRepository for SqliteStorage {
    fn find_credential_by_email(&self, email: &str) -> Result<Option<Credential>> {
        self.find_credential("email", email)
    }

    fn find_credential_by_username(&self, username: &str) -> Result<Option<Credential>> {
        self.find_credential("username", username)
    }

    fn insert_credential(&self, credential: &Credential) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3)",
            params![
                &credential.username,
                &credential.email,
                &credential.password_hash,
            ],
        )
        .map_err(|e| unique_violation(&e).map_or(StorageError::Database(e), StorageError::Conflict))?;

        Ok(())
    }
}

impl LocationRepository for SqliteStorage {
    fn list_location_records(&self) -> Result<Vec<LocationRecord>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r"
            SELECT name, longitude, latitude
            FROM people
            ORDER BY id
            ",
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(LocationRecord {
                    name: row.get(0)?,
                    longitude: row.get(1)?,
                    latitude: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn insert_location_record(&self, record: &LocationRecord) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO people (name, longitude, latitude) VALUES (?1, ?2, ?3)",
            params![&record.name, record.longitude, record.latitude],
        )?;

        Ok(())
    }

    fn update_location_records_by_name(
        &self,
        name: &str,
        coordinates: Coordinates,
    ) -> Result<usize> {
        let conn = self.lock()?;

        let updated = conn.execute(
            "UPDATE people SET longitude = ?1, latitude = ?2 WHERE name = ?3",
            params![coordinates.longitude(), coordinates.latitude(), name],
        )?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use super::*;

    fn point(latitude: f64, longitude: f64) -> Coordinates {
        Coordinates::new(latitude, longitude).unwrap()
    }

    fn test_credential(id: u8) -> Credential {
        Credential::new(
            format!("user{id}"),
            format!("user{id}@example.com"),
            format!("$2b$04$hash{id}"),
        )
    }

    #[test]
    fn find_missing_credential_returns_none() {
        let storage = SqliteStorage::in_memory().unwrap();

        assert!(storage
            .find_credential_by_email("nobody@example.com")
            .unwrap()
            .is_none());
        assert!(storage.find_credential_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn insert_and_find_credential() {
        let storage = SqliteStorage::in_memory().unwrap();
        let credential = test_credential(1);

        storage.insert_credential(&credential).unwrap();

        let by_email = storage
            .find_credential_by_email("user1@example.com")
            .unwrap()
            .unwrap();
        let by_name = storage.find_credential_by_username("user1").unwrap().unwrap();

        assert_eq!(by_email, credential);
        assert_eq!(by_name, credential);
        assert_eq!(storage.credential_count().unwrap(), 1);
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.insert_credential(&test_credential(1)).unwrap();

        let mut duplicate = test_credential(2);
        duplicate.email = "user1@example.com".to_string();

        let err = storage.insert_credential(&duplicate).unwrap_err();
        assert!(matches!(err, StorageError::Conflict(UniqueField::Email)));
        assert_eq!(storage.credential_count().unwrap(), 1);
    }

    #[test]
    fn duplicate_username_is_a_conflict() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.insert_credential(&test_credential(1)).unwrap();

        let mut duplicate = test_credential(2);
        duplicate.username = "user1".to_string();

        let err = storage.insert_credential(&duplicate).unwrap_err();
        assert!(matches!(err, StorageError::Conflict(UniqueField::Username)));
    }

    #[test]
    fn list_returns_records_in_insertion_order() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage
            .insert_location_record(&LocationRecord::new("b", point(1.0, 2.0)))
            .unwrap();
        storage
            .insert_location_record(&LocationRecord::new("a", point(3.0, 4.0)))
            .unwrap();

        let records = storage.list_location_records().unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(records[1].latitude, 3.0);
        assert_eq!(records[1].longitude, 4.0);
    }

    #[test]
    fn update_touches_every_record_with_the_name() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage
            .insert_location_record(&LocationRecord::new("carol", point(1.0, 1.0)))
            .unwrap();
        storage
            .insert_location_record(&LocationRecord::new("carol", point(2.0, 2.0)))
            .unwrap();
        storage
            .insert_location_record(&LocationRecord::new("dave", point(3.0, 3.0)))
            .unwrap();

        let updated = storage
            .update_location_records_by_name("carol", point(10.0, 20.0))
            .unwrap();
        assert_eq!(updated, 2);

        let records = storage.list_location_records().unwrap();
        for record in records.iter().filter(|r| r.name == "carol") {
            assert_eq!(record.latitude, 10.0);
            assert_eq!(record.longitude, 20.0);
        }
        assert_eq!(records[2].latitude, 3.0);
    }

    #[test]
    fn update_unknown_name_is_a_no_op() {
        let storage = SqliteStorage::in_memory().unwrap();
        let updated = storage
            .update_location_records_by_name("ghost", point(0.0, 0.0))
            .unwrap();
        assert_eq!(updated, 0);
        assert!(storage.list_location_records().unwrap().is_empty());
    }

    #[test]
    fn schema_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nearby.db");

        {
            let storage = SqliteStorage::new(&path).unwrap();
            storage.insert_credential(&test_credential(7)).unwrap();
        }

        let storage = SqliteStorage::new(&path).unwrap();
        assert!(storage.find_credential_by_username("user7").unwrap().is_some());
    }
}
