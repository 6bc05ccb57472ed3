//
//  life360-client
//  model/location.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Location fixes reported by a member's device.
//!
//! Locations appear embedded in members (`member.location`), in history
//! listings and as the result of a fulfilled location request.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::coerce::Loose;
use super::coordinates::LatLon;
use super::{Fields, Populate, Resource};

/// A single location fix.
///
/// # Example
///
/// ```rust
/// use life360_client::model::{Location, Resource};
/// use serde_json::json;
///
/// let location = Location::from_raw(&json!({
///     "latitude": "51.5007",
///     "longitude": "-0.1246",
///     "battery": "87",
///     "inTransit": "0",
///     "timestamp": "1577836800",
///     "driveSDKStatus": "OFF"
/// }));
///
/// assert_eq!(location.battery.as_ref().and_then(|b| b.get()), Some(87));
/// assert_eq!(location.in_transit.as_ref().and_then(|t| t.get()), Some(false));
/// assert!(location.lat_lon().is_some());
/// assert!(location.extra().contains_key("driveSDKStatus"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Latitude in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Loose<f64>>,

    /// Longitude in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Loose<f64>>,

    /// Name of the place the member is at, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// First address line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,

    /// Second address line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,

    /// Start of the stay at this location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<Loose<DateTime<Utc>>>,

    /// End of the stay at this location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<Loose<DateTime<Utc>>>,

    /// Since when the member has been here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<Loose<DateTime<Utc>>>,

    /// When the fix was taken.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Loose<DateTime<Utc>>>,

    /// Accuracy radius in meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<Loose<i64>>,

    /// Battery level in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<Loose<i64>>,

    /// Charging state as reported by the device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge: Option<Loose<i64>>,

    /// Speed as reported by the device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<Loose<i64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_transit: Option<Loose<bool>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_driving: Option<Loose<bool>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_state: Option<Loose<bool>>,

    /// Unmodelled fields (`shortAddress`, `source`, `tripId`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    /// Returns the fix as a coordinate pair when both components are numeric.
    pub fn lat_lon(&self) -> Option<LatLon> {
        let lat = self.latitude.as_ref()?.get()?;
        let lon = self.longitude.as_ref()?.get()?;
        Some(LatLon::new(lat, lon))
    }
}

impl Populate for Location {
    fn populate(&mut self, raw: &Map<String, Value>) {
        let mut fields = Fields::new(raw);
        fields.float("latitude", &mut self.latitude);
        fields.float("longitude", &mut self.longitude);
        fields.text("name", &mut self.name);
        fields.text("address1", &mut self.address1);
        fields.text("address2", &mut self.address2);

        fields.timestamp("startTimestamp", &mut self.start_timestamp);
        fields.timestamp("endTimestamp", &mut self.end_timestamp);
        fields.timestamp("since", &mut self.since);
        fields.timestamp("timestamp", &mut self.timestamp);

        fields.int("accuracy", &mut self.accuracy);
        fields.int("battery", &mut self.battery);
        fields.int("charge", &mut self.charge);
        fields.int("speed", &mut self.speed);

        fields.bool("inTransit", &mut self.in_transit);
        fields.bool("isDriving", &mut self.is_driving);
        fields.bool("wifiState", &mut self.wifi_state);
        fields.finish(&mut self.extra);
    }
}

impl Resource for Location {
    fn names(&self) -> Vec<String> {
        self.name.iter().cloned().collect()
    }

    fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::coerce::Loose;
    use serde_json::json;

    #[test]
    fn test_populate_coerces_schema_fields() {
        let location = Location::from_raw(&json!({
            "latitude": 37.77,
            "longitude": "-122.41",
            "accuracy": "15",
            "speed": "-1",
            "isDriving": "1",
            "wifiState": "yes",
            "since": 1_600_000_000,
            "startTimestamp": "not a date"
        }));

        assert_eq!(location.lat_lon(), Some(LatLon::new(37.77, -122.41)));
        assert_eq!(location.accuracy, Some(Loose::Typed(15)));
        assert_eq!(location.speed, Some(Loose::Raw(json!("-1"))));
        assert_eq!(location.is_driving, Some(Loose::Typed(true)));
        assert_eq!(location.wifi_state, Some(Loose::Typed(true)));
        assert_eq!(
            location.since.as_ref().and_then(|s| s.typed()).map(|t| t.timestamp()),
            Some(1_600_000_000)
        );
        assert_eq!(location.start_timestamp, Some(Loose::Raw(json!("not a date"))));
    }

    #[test]
    fn test_repopulate_overwrites_present_fields_only() {
        let mut location = Location::from_raw(&json!({"battery": "50", "name": "Home"}));
        location.populate(json!({"battery": "49", "charge": "1"}).as_object().unwrap());
        assert_eq!(location.battery, Some(Loose::Typed(49)));
        assert_eq!(location.charge, Some(Loose::Typed(1)));
        assert_eq!(location.name.as_deref(), Some("Home"));
    }
}
