//! Reusable test helpers for integration tests.
//!
//! These helpers open real `SQLite` databases in unique temporary
//! directories, so every test gets an isolated file-backed store.

#![allow(dead_code)]

use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use nearby_core::credential::Registration;
use nearby_core::location::Coordinates;
use nearby_core::storage::SqliteStorage;

/// Fastest bcrypt cost, to keep hashing cheap in tests.
pub const TEST_HASH_COST: u32 = 4;

/// A password that satisfies every policy rule.
pub const STRONG_PASSWORD: &str = "Abcdef1!";

/// Atomic counter for unique test directory names.
static HELPER_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Creates a unique temporary directory for test isolation.
///
/// Each call produces a distinct path by combining the prefix, process ID,
/// and an atomic counter.
pub fn unique_temp_dir(prefix: &str) -> PathBuf {
    let id = HELPER_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = env::temp_dir().join(format!(
        "nearby_test_{}_{}_{}",
        prefix,
        std::process::id(),
        id
    ));
    std::fs::create_dir_all(&dir).expect("should create temp dir");
    dir
}

/// Removes a temporary test directory. Ignores errors silently.
pub fn cleanup_dir(dir: &Path) {
    let _ = std::fs::remove_dir_all(dir);
}

/// Opens file-backed storage inside `dir`.
pub fn open_storage(dir: &Path) -> Arc<SqliteStorage> {
    Arc::new(SqliteStorage::new(&dir.join("nearby.db")).expect("should open storage"))
}

/// Builds a registration using [`STRONG_PASSWORD`] for both password fields.
pub fn registration<'a>(username: &'a str, email: &'a str) -> Registration<'a> {
    Registration {
        username,
        email,
        password: STRONG_PASSWORD,
        confirm_password: STRONG_PASSWORD,
    }
}

/// Shorthand for validated coordinates.
pub fn point(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates::new(latitude, longitude).expect("valid test coordinates")
}
