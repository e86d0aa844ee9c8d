//! Great-circle distance between two points.
//!
//! Uses the spherical law of cosines, scaled through nautical miles and
//! statute miles to kilometres:
//!
//! ```text
//! d = acos(sin φ1 · sin φ2 + cos φ1 · cos φ2 · cos Δλ)   (radians)
//! km = d · 180/π · 60 · 1.1515 · 1.609344
//! ```

use std::f64::consts::PI;

/// Radius below which a record counts as nearby, in kilometres.
pub const PROXIMITY_RADIUS_KM: f64 = 0.1;

/// Nautical miles per degree of arc.
const NAUTICAL_MILES_PER_DEGREE: f64 = 60.0;

/// Statute miles per nautical mile, as used by the reference formula.
const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.1515;

/// Kilometres per statute mile.
const KILOMETRES_PER_MILE: f64 = 1.609_344;

/// Returns the distance in kilometres between two points in decimal degrees.
///
/// The cosine term is clamped into `[-1, 1]` before `acos`, since rounding
/// can push it just past 1 for nearby points and past -1 for antipodal
/// ones. Identical points are exactly 0 apart, and swapping the points
/// gives a bit-identical result.
///
/// # Examples
///
/// ```
/// use nearby_core::location::distance_km;
///
/// assert_eq!(distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
///
/// // One degree of latitude is roughly 111 km.
/// let d = distance_km(0.0, 0.0, 1.0, 0.0);
/// assert!((d - 111.2).abs() < 0.5);
/// ```
#[must_use]
#[allow(clippy::float_cmp)] // Exact identity is the case being detected.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if lat1 == lat2 && lon1 == lon2 {
        return 0.0;
    }

    let radlat1 = PI * lat1 / 180.0;
    let radlat2 = PI * lat2 / 180.0;

    // cos is even, so the sign of the longitude difference is irrelevant.
    let theta = (lon1 - lon2).abs();
    let radtheta = PI * theta / 180.0;

    let cosine = (radlat1.sin() * radlat2.sin()
        + radlat1.cos() * radlat2.cos() * radtheta.cos())
    .clamp(-1.0, 1.0);

    cosine.acos() * 180.0 / PI
        * NAUTICAL_MILES_PER_DEGREE
        * STATUTE_MILES_PER_NAUTICAL_MILE
        * KILOMETRES_PER_MILE
}

/// Returns `true` if the two points are strictly closer than
/// [`PROXIMITY_RADIUS_KM`].
#[must_use]
pub fn is_nearby(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> bool {
    distance_km(lat1, lon1, lat2, lon2) < PROXIMITY_RADIUS_KM
}
