//! Location records and proximity queries.
//!
//! Provides:
//! - Validated coordinates ([`Coordinates`]) parsed from request text
//! - Great-circle distance in kilometres ([`distance_km`])
//! - A [`ProximityEngine`] that finds records within
//!   [`PROXIMITY_RADIUS_KM`] of a point and inserts or moves records by name
//!
//! Location records are independent of registered credentials: a record's
//! `name` is free text and refers to no user.
//!
//! # Example Usage
//!
//! ```
//! use nearby_core::location::{distance_km, Coordinates, PROXIMITY_RADIUS_KM};
//!
//! let a = Coordinates::parse(Some("48.8584"), Some("2.2945")).unwrap();
//! let b = Coordinates::new(48.8585, 2.2946).unwrap();
//!
//! let d = distance_km(a.latitude(), a.longitude(), b.latitude(), b.longitude());
//! assert!(d < PROXIMITY_RADIUS_KM);
//! ```

pub mod distance;
mod engine;
mod error;
pub mod types;

pub use distance::{distance_km, is_nearby, PROXIMITY_RADIUS_KM};
pub use engine::{ProximityEngine, UpsertOutcome};
pub use error::{LocationError, Result};
pub use types::{Coordinates, LocationRecord, LATITUDE_RANGE, LONGITUDE_RANGE};
