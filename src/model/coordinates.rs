//
//  life360-client
//  model/coordinates.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Coordinate extraction from loosely shaped input.
//!
//! Callers hand coordinates over in several shapes: a `[lat, lon]` pair, a
//! pair nested in a single-element array, or an object using one of many key
//! spellings. [`CoordinateShape`] classifies the input and each variant has
//! its own decoder.
//!
//! # Example
//!
//! ```rust
//! use life360_client::model::{extract_lat_lon, LatLon};
//! use serde_json::json;
//!
//! // 95 is outside the latitude range, so it must be the longitude.
//! assert_eq!(extract_lat_lon(&json!([95, 10])).unwrap(), LatLon::new(10.0, 95.0));
//! assert_eq!(
//!     extract_lat_lon(&json!({"latitude": 40.7, "longitude": -74.0})).unwrap(),
//!     LatLon::new(40.7, -74.0),
//! );
//! assert!(extract_lat_lon(&json!({})).is_err());
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::coerce::as_float;

const LATITUDE_MIN: f64 = -90.0;
const LATITUDE_MAX: f64 = 90.0;

/// Latitude keys in ascending priority; later keys overwrite earlier ones.
const LATITUDE_KEYS: &[&str] = &["lat", "latitude", "y"];

/// Longitude keys in ascending priority; later keys overwrite earlier ones.
const LONGITUDE_KEYS: &[&str] = &["lon", "longitude", "lng", "long", "x"];

/// Errors raised when coordinates cannot be resolved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateParseError {
    /// No latitude could be found in the input.
    #[error("Unable to find latitude from coordinates")]
    MissingLatitude,

    /// No longitude could be found in the input.
    #[error("Unable to find longitude from coordinates")]
    MissingLongitude,

    /// The input has a shape that cannot carry coordinates.
    #[error("Unable to parse coordinates: {0}")]
    Unsupported(String),
}

/// A resolved latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl LatLon {
    /// Creates a coordinate pair.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<LatLon> for Value {
    fn from(point: LatLon) -> Self {
        serde_json::json!({ "lat": point.lat, "lon": point.lon })
    }
}

impl TryFrom<&Value> for LatLon {
    type Error = CoordinateParseError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        extract_lat_lon(value)
    }
}

/// The recognised input shapes for coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateShape<'a> {
    /// A two-element sequence; element roles are decided by range.
    Pair(&'a Value, &'a Value),
    /// A one-element sequence wrapping another coordinate value.
    Nested(&'a Value),
    /// An object with latitude/longitude under one of the known keys.
    Object(&'a Map<String, Value>),
}

impl<'a> CoordinateShape<'a> {
    /// Classifies a JSON value into one of the supported shapes.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateParseError::Unsupported`] for scalars, `null` and
    /// sequences that are empty or longer than two elements.
    pub fn classify(value: &'a Value) -> Result<Self, CoordinateParseError> {
        match value {
            Value::Array(items) => match items.as_slice() {
                [lat, lon] => Ok(Self::Pair(lat, lon)),
                [inner] => Ok(Self::Nested(inner)),
                _ => Err(CoordinateParseError::Unsupported(format!(
                    "expected 1 or 2 elements, got {}",
                    items.len()
                ))),
            },
            Value::Object(map) => Ok(Self::Object(map)),
            other => Err(CoordinateParseError::Unsupported(format!(
                "expected a pair or an object, got {other}"
            ))),
        }
    }

    /// Decodes this shape into a coordinate pair.
    pub fn decode(self) -> Result<LatLon, CoordinateParseError> {
        match self {
            Self::Pair(first, second) => decode_pair(first, second),
            Self::Nested(inner) => extract_lat_lon(inner),
            Self::Object(map) => decode_object(map),
        }
    }
}

/// Resolves a latitude/longitude pair from a loosely shaped value.
///
/// Accepted shapes:
///
/// - `[a, b]`: if `a` lies outside [-90, 90] it is the longitude and `b` the
///   latitude, otherwise `a` is the latitude and `b` the longitude.
/// - `[inner]`: `inner` is resolved recursively.
/// - `{...}`: latitude from `lat`, `latitude`, `y` and longitude from `lon`,
///   `longitude`, `lng`, `long`, `x`. When several keys are present the last
///   one in that order wins.
///
/// Numeric strings are accepted wherever numbers are.
///
/// # Errors
///
/// Returns a [`CoordinateParseError`] when either component is missing or the
/// input has any other shape.
pub fn extract_lat_lon(value: &Value) -> Result<LatLon, CoordinateParseError> {
    CoordinateShape::classify(value)?.decode()
}

fn number(value: &Value) -> Option<f64> {
    as_float(value).get()
}

fn decode_pair(first: &Value, second: &Value) -> Result<LatLon, CoordinateParseError> {
    let a = number(first).ok_or_else(|| {
        CoordinateParseError::Unsupported(format!("non-numeric coordinate {first}"))
    })?;
    let b = number(second).ok_or_else(|| {
        CoordinateParseError::Unsupported(format!("non-numeric coordinate {second}"))
    })?;

    if !(LATITUDE_MIN..=LATITUDE_MAX).contains(&a) {
        Ok(LatLon::new(b, a))
    } else {
        Ok(LatLon::new(a, b))
    }
}

fn last_present(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .filter_map(number)
        .last()
}

fn decode_object(map: &Map<String, Value>) -> Result<LatLon, CoordinateParseError> {
    let lat = last_present(map, LATITUDE_KEYS).ok_or(CoordinateParseError::MissingLatitude)?;
    let lon = last_present(map, LONGITUDE_KEYS).ok_or(CoordinateParseError::MissingLongitude)?;
    Ok(LatLon::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pair_in_range_keeps_order() {
        assert_eq!(extract_lat_lon(&json!([10, 95])).unwrap(), LatLon::new(10.0, 95.0));
        assert_eq!(extract_lat_lon(&json!([-33.9, 18.4])).unwrap(), LatLon::new(-33.9, 18.4));
    }

    #[test]
    fn test_pair_out_of_range_swaps() {
        assert_eq!(extract_lat_lon(&json!([95, 10])).unwrap(), LatLon::new(10.0, 95.0));
        assert_eq!(extract_lat_lon(&json!([-122.4, 37.8])).unwrap(), LatLon::new(37.8, -122.4));
    }

    #[test]
    fn test_pair_accepts_numeric_strings() {
        assert_eq!(extract_lat_lon(&json!(["51.5", "-0.12"])).unwrap(), LatLon::new(51.5, -0.12));
        assert!(extract_lat_lon(&json!(["north", 1])).is_err());
    }

    #[test]
    fn test_nested_single_element() {
        assert_eq!(extract_lat_lon(&json!([[10, 20]])).unwrap(), LatLon::new(10.0, 20.0));
        assert_eq!(
            extract_lat_lon(&json!([[{"lat": 1, "lng": 2}]])).unwrap(),
            LatLon::new(1.0, 2.0)
        );
    }

    #[test]
    fn test_object_keys() {
        assert_eq!(
            extract_lat_lon(&json!({"latitude": 40.7, "longitude": -74.0})).unwrap(),
            LatLon::new(40.7, -74.0)
        );
        assert_eq!(extract_lat_lon(&json!({"y": 3, "x": 4})).unwrap(), LatLon::new(3.0, 4.0));
        assert_eq!(extract_lat_lon(&json!({"lat": 0, "lon": 0})).unwrap(), LatLon::new(0.0, 0.0));
    }

    #[test]
    fn test_object_later_keys_win() {
        let value = json!({"lat": 1, "latitude": 2, "y": 3, "lon": 4, "lng": 5, "x": 6});
        assert_eq!(extract_lat_lon(&value).unwrap(), LatLon::new(3.0, 6.0));
    }

    #[test]
    fn test_object_missing_components() {
        assert_eq!(extract_lat_lon(&json!({})), Err(CoordinateParseError::MissingLatitude));
        assert_eq!(
            extract_lat_lon(&json!({"lat": 1})),
            Err(CoordinateParseError::MissingLongitude)
        );
    }

    #[test]
    fn test_unsupported_shapes() {
        for value in [json!(12), json!("12,13"), json!(null), json!([]), json!([1, 2, 3])] {
            assert!(
                matches!(extract_lat_lon(&value), Err(CoordinateParseError::Unsupported(_))),
                "{value}"
            );
        }
    }

    #[test]
    fn test_lat_lon_round_trips_through_value() {
        let point = LatLon::new(12.5, -8.25);
        assert_eq!(LatLon::try_from(&Value::from(point)).unwrap(), point);
    }
}
