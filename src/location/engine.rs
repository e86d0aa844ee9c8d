//! Proximity queries and position updates.

use std::sync::Arc;

use tracing::{debug, info};

use super::distance::is_nearby;
use super::error::Result;
use super::types::{Coordinates, LocationRecord};
use crate::storage::LocationRepository;

/// What a [`ProximityEngine::upsert`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new record was appended.
    Inserted,
    /// Existing records with the name were moved; holds how many.
    Updated(usize),
}

/// Filters and updates location records through a [`LocationRepository`].
///
/// Every query reads the full record set from storage; nothing is cached
/// and no spatial index is used.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use nearby_core::location::{Coordinates, ProximityEngine};
/// use nearby_core::storage::SqliteStorage;
///
/// let engine = ProximityEngine::new(Arc::new(SqliteStorage::in_memory().unwrap()));
/// let here = Coordinates::new(51.5007, -0.1246).unwrap();
///
/// engine.upsert("carol", here, true).unwrap();
/// let nearby = engine.query(here).unwrap();
/// assert_eq!(nearby.len(), 1);
/// ```
pub struct ProximityEngine<S: ?Sized> {
    storage: Arc<S>,
}

impl<S: LocationRepository + ?Sized> ProximityEngine<S> {
    /// Creates an engine over the given repository.
    #[must_use]
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Returns every record strictly within
    /// [`PROXIMITY_RADIUS_KM`](super::PROXIMITY_RADIUS_KM) of `at`, in
    /// storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be read.
    pub fn query(&self, at: Coordinates) -> Result<Vec<LocationRecord>> {
        let records = self.storage.list_location_records()?;
        let scanned = records.len();

        let nearby: Vec<_> = records
            .into_iter()
            .filter(|record| {
                is_nearby(record.latitude, record.longitude, at.latitude(), at.longitude())
            })
            .collect();

        debug!(scanned, matched = nearby.len(), "Proximity query");
        Ok(nearby)
    }

    /// Records a position for `name`.
    ///
    /// With `is_new` a record is always appended, even if the name is
    /// already present. Otherwise every record called `name` is moved to
    /// `at`; an unknown name updates nothing and is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert(&self, name: &str, at: Coordinates, is_new: bool) -> Result<UpsertOutcome> {
        if is_new {
            self.storage
                .insert_location_record(&LocationRecord::new(name, at))?;
            info!(name, "Added location record");
            Ok(UpsertOutcome::Inserted)
        } else {
            let updated = self.storage.update_location_records_by_name(name, at)?;
            info!(name, updated, "Updated location records");
            Ok(UpsertOutcome::Updated(updated))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use super::*;
    use crate::location::LocationError;
    use crate::storage::{MemoryStorage, StorageError};

    fn point(latitude: f64, longitude: f64) -> Coordinates {
        Coordinates::new(latitude, longitude).unwrap()
    }

    fn engine() -> ProximityEngine<MemoryStorage> {
        ProximityEngine::new(Arc::new(MemoryStorage::new()))
    }

    struct BrokenStorage;

    impl LocationRepository for BrokenStorage {
        fn list_location_records(&self) -> crate::storage::Result<Vec<LocationRecord>> {
            Err(StorageError::Storage("connection lost".to_string()))
        }

        fn insert_location_record(&self, _record: &LocationRecord) -> crate::storage::Result<()> {
            Err(StorageError::Storage("connection lost".to_string()))
        }

        fn update_location_records_by_name(
            &self,
            _name: &str,
            _coordinates: Coordinates,
        ) -> crate::storage::Result<usize> {
            Err(StorageError::Storage("connection lost".to_string()))
        }
    }

    #[test]
    fn query_on_empty_storage_is_empty() {
        assert!(engine().query(point(0.0, 0.0)).unwrap().is_empty());
    }

    #[test]
    fn record_at_query_point_is_included() {
        let engine = engine();
        engine.upsert("alice", point(12.34, 56.78), true).unwrap();

        let found = engine.query(point(12.34, 56.78)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "alice");
    }

    #[test]
    fn record_fifty_km_away_is_excluded() {
        let engine = engine();
        // 0.45° of latitude is roughly 50 km.
        engine.upsert("far", point(10.45, 20.0), true).unwrap();
        engine.upsert("near", point(10.0003, 20.0), true).unwrap();

        let found = engine.query(point(10.0, 20.0)).unwrap();
        let names: Vec<_> = found.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["near"]);
    }

    #[test]
    fn query_keeps_storage_order() {
        let engine = engine();
        for name in ["c", "a", "b"] {
            engine.upsert(name, point(1.0, 1.0), true).unwrap();
        }

        let found = engine.query(point(1.0, 1.0)).unwrap();
        let names: Vec<_> = found.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn inserting_twice_creates_duplicates() {
        let engine = engine();
        assert_eq!(
            engine.upsert("bob", point(1.0, 1.0), true).unwrap(),
            UpsertOutcome::Inserted
        );
        engine.upsert("bob", point(1.0, 1.0), true).unwrap();

        assert_eq!(engine.query(point(1.0, 1.0)).unwrap().len(), 2);
    }

    #[test]
    fn update_moves_every_record_with_the_name() {
        let engine = engine();
        engine.upsert("bob", point(1.0, 1.0), true).unwrap();
        engine.upsert("bob", point(2.0, 2.0), true).unwrap();

        let outcome = engine.upsert("bob", point(-5.0, 7.0), false).unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated(2));

        let found = engine.query(point(-5.0, 7.0)).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|r| r.latitude == -5.0 && r.longitude == 7.0));
    }

    #[test]
    fn update_of_unknown_name_is_a_no_op() {
        let engine = engine();
        let outcome = engine.upsert("ghost", point(1.0, 1.0), false).unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated(0));
        assert!(engine.query(point(1.0, 1.0)).unwrap().is_empty());
    }

    #[test]
    fn storage_failures_propagate() {
        let engine = ProximityEngine::new(Arc::new(BrokenStorage));

        let err = engine.query(point(0.0, 0.0)).unwrap_err();
        assert!(matches!(err, LocationError::Storage(_)));
        assert!(err.is_fatal());

        assert!(engine.upsert("x", point(0.0, 0.0), true).is_err());
        assert!(engine.upsert("x", point(0.0, 0.0), false).is_err());
    }
}
