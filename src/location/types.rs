//! Location data types.

use serde::{Deserialize, Serialize};

use super::error::{LocationError, Result};

/// Latitude bounds in decimal degrees.
pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;

/// Longitude bounds in decimal degrees.
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// A validated point on Earth.
///
/// Construction fails for non-finite values, latitudes outside
/// `-90.0..=90.0` and longitudes outside `-180.0..=180.0`.
///
/// # Example
///
/// ```
/// use nearby_core::location::Coordinates;
///
/// let point = Coordinates::new(37.7749, -122.4194).unwrap();
/// assert_eq!(point.latitude(), 37.7749);
///
/// assert!(Coordinates::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Creates validated coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::OutOfRange`] if either value is not finite
    /// or lies outside its valid range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        check_range("latitude", latitude, &LATITUDE_RANGE)?;
        check_range("longitude", longitude, &LONGITUDE_RANGE)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parses coordinates from request text.
    ///
    /// Absent or empty fields are reported as missing before any parsing
    /// is attempted, so a request lacking both fields names the latitude.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::MissingParameter`] for an absent field,
    /// [`LocationError::InvalidCoordinate`] for text that is not a number,
    /// and [`LocationError::OutOfRange`] for numbers outside the valid range.
    pub fn parse(latitude: Option<&str>, longitude: Option<&str>) -> Result<Self> {
        let latitude = required("latitude", latitude)?;
        let longitude = required("longitude", longitude)?;
        Self::new(
            parse_number("latitude", latitude)?,
            parse_number("longitude", longitude)?,
        )
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

fn required<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(LocationError::MissingParameter(field)),
    }
}

fn parse_number(field: &'static str, text: &str) -> Result<f64> {
    text.parse::<f64>()
        .map_err(|_| LocationError::InvalidCoordinate {
            field,
            value: text.to_string(),
        })
}

fn check_range(
    field: &'static str,
    value: f64,
    range: &std::ops::RangeInclusive<f64>,
) -> Result<()> {
    if value.is_finite() && range.contains(&value) {
        Ok(())
    } else {
        Err(LocationError::OutOfRange { field, value })
    }
}

/// A named point on Earth.
///
/// Names are not unique and are unrelated to registered credentials.
/// Serialized as `{"name", "longtitude", "latitude"}`, the wire shape
/// existing clients read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Display name of the person at this location.
    pub name: String,

    /// Longitude in decimal degrees.
    #[serde(rename = "longtitude", alias = "longitude")]
    pub longitude: f64,

    /// Latitude in decimal degrees.
    pub latitude: f64,
}

impl LocationRecord {
    /// Creates a record at the given coordinates.
    #[must_use]
    pub fn new(name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            name: name.into(),
            longitude: coordinates.longitude(),
            latitude: coordinates.latitude(),
        }
    }
}
