//
//  life360-client
//  api/location.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Reporting the logged-in user's own location.
//!
//! Reports go to the device host (`android.life360.com` by default) as a
//! body-less `PUT /v4/locations`. The report itself travels in the
//! `X-UserContext` header: a base64-encoded JSON object with `geolocation`,
//! `geolocation_meta` and `device` sections whose values are all strings.
//!
//! # Example
//!
//! ```rust,no_run
//! use life360_client::api::{Life360Client, LocationReport};
//!
//! # async fn example() -> Result<(), life360_client::api::ApiError> {
//! let mut client = Life360Client::new()?;
//! client.login("user@example.com", "secret").await?;
//!
//! let report = LocationReport::new(51.5007, -0.1246).accuracy("5.0").battery("87");
//! client.put_location(&report).await?;
//! # Ok(())
//! # }
//! ```

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use super::{ApiError, Life360Client, RequestOptions, ResponseBody};

const LOCATIONS_PATH: &str = "/v4/locations";

/// Header carrying the encoded report.
pub const USER_CONTEXT_HEADER: &str = "X-UserContext";

const DEFAULT_ALTITUDE: &str = "0.0";
const DEFAULT_ACCURACY: &str = "10.00";
const DEFAULT_HEADING: &str = "0.0";
const DEFAULT_SPEED: &str = "0.0";
const DEFAULT_BUILD: &str = "228980";
const DRIVE_SDK_STATUS: &str = "OFF";
const USER_ACTIVITY: &str = "unknown";

/// A location report for [`Life360Client::put_location`].
///
/// Only the position is required. Unset geolocation and device fields are
/// filled with the values the Android app sends; unset metadata fields are
/// left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationReport {
    pub lat: f64,
    pub lon: f64,
    /// Altitude in meters.
    pub alt: Option<String>,
    /// Horizontal accuracy in meters.
    pub accuracy: Option<String>,
    pub heading: Option<String>,
    pub speed: Option<String>,
    /// Fix time; the moment of sending when `None`.
    pub timestamp: Option<DateTime<Utc>>,
    /// Age of the fix.
    pub age: Option<String>,
    /// SSID of the connected wifi network.
    pub wssid: Option<String>,
    pub reqssid: Option<String>,
    /// Location mode reported by the device.
    pub lmode: Option<String>,
    /// Battery level in percent.
    pub battery: Option<String>,
    pub charge: Option<String>,
    pub wifi_state: Option<String>,
    /// App build number.
    pub build: Option<String>,
}

impl LocationReport {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ..Self::default()
        }
    }

    pub fn altitude(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn accuracy(mut self, accuracy: impl Into<String>) -> Self {
        self.accuracy = Some(accuracy.into());
        self
    }

    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn speed(mut self, speed: impl Into<String>) -> Self {
        self.speed = Some(speed.into());
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn battery(mut self, battery: impl Into<String>) -> Self {
        self.battery = Some(battery.into());
        self
    }

    pub fn charge(mut self, charge: impl Into<String>) -> Self {
        self.charge = Some(charge.into());
        self
    }

    pub fn wifi_state(mut self, wifi_state: impl Into<String>) -> Self {
        self.wifi_state = Some(wifi_state.into());
        self
    }

    /// Builds the user context object with defaults applied.
    ///
    /// # Parameters
    ///
    /// * `now` - Used as the fix time when the report has none
    ///
    /// # Example
    ///
    /// ```rust
    /// use chrono::DateTime;
    /// use life360_client::api::LocationReport;
    ///
    /// let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    /// let context = LocationReport::new(1.5, -2.25).user_context(now);
    /// assert_eq!(context["geolocation"]["lat"], "1.5");
    /// assert_eq!(context["geolocation"]["timestamp"], "1700000000");
    /// assert_eq!(context["device"]["build"], "228980");
    /// ```
    pub fn user_context(&self, now: DateTime<Utc>) -> Value {
        let mut geolocation = Map::new();
        geolocation.insert("lat".to_string(), self.lat.to_string().into());
        geolocation.insert("lon".to_string(), self.lon.to_string().into());
        insert_or(&mut geolocation, "alt", &self.alt, DEFAULT_ALTITUDE);
        insert_or(&mut geolocation, "accuracy", &self.accuracy, DEFAULT_ACCURACY);
        insert_or(&mut geolocation, "heading", &self.heading, DEFAULT_HEADING);
        insert_or(&mut geolocation, "speed", &self.speed, DEFAULT_SPEED);
        let timestamp = self.timestamp.unwrap_or(now).timestamp().to_string();
        geolocation.insert("timestamp".to_string(), timestamp.into());
        insert_some(&mut geolocation, "age", &self.age);

        let mut meta = Map::new();
        insert_some(&mut meta, "wssid", &self.wssid);
        insert_some(&mut meta, "reqssid", &self.reqssid);
        insert_some(&mut meta, "lmode", &self.lmode);

        let mut device = Map::new();
        insert_some(&mut device, "battery", &self.battery);
        insert_some(&mut device, "charge", &self.charge);
        insert_some(&mut device, "wifi_state", &self.wifi_state);
        insert_or(&mut device, "build", &self.build, DEFAULT_BUILD);
        device.insert("driveSDKStatus".to_string(), DRIVE_SDK_STATUS.into());
        device.insert("userActivity".to_string(), USER_ACTIVITY.into());

        json!({
            "geolocation": geolocation,
            "geolocation_meta": meta,
            "device": device,
        })
    }

    /// The `X-UserContext` header value: the user context as base64 JSON.
    pub fn user_context_header(&self, now: DateTime<Utc>) -> String {
        STANDARD.encode(self.user_context(now).to_string())
    }
}

fn insert_some(map: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value.clone().into());
    }
}

fn insert_or(map: &mut Map<String, Value>, key: &str, value: &Option<String>, default: &str) {
    let value = value.as_deref().unwrap_or(default);
    map.insert(key.to_string(), value.into());
}

impl Life360Client {
    /// Reports a location for the logged-in user's device.
    ///
    /// The request goes to the configured location host with this client's
    /// device id and the current session credential.
    ///
    /// # Parameters
    ///
    /// * `report` - Position plus optional device details
    ///
    /// # Returns
    ///
    /// Whatever the server answered with, usually an empty body.
    pub async fn put_location(&self, report: &LocationReport) -> Result<ResponseBody, ApiError> {
        let options = RequestOptions::new()
            .hostname(self.config().location_hostname.clone())
            .method("PUT")
            .header("X-Device-ID", self.device_id())
            .header(USER_CONTEXT_HEADER, report.user_context_header(Utc::now()));

        tracing::debug!("Reporting location {}, {}", report.lat, report.lon);
        self.execute(LOCATIONS_PATH, &options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_defaults_are_filled() {
        let context = LocationReport::new(40.5, -74.25).user_context(now());
        assert_eq!(
            context,
            json!({
                "geolocation": {
                    "lat": "40.5",
                    "lon": "-74.25",
                    "alt": "0.0",
                    "accuracy": "10.00",
                    "heading": "0.0",
                    "speed": "0.0",
                    "timestamp": "1700000000"
                },
                "geolocation_meta": {},
                "device": {
                    "build": "228980",
                    "driveSDKStatus": "OFF",
                    "userActivity": "unknown"
                }
            })
        );
    }

    #[test]
    fn test_given_values_win() {
        let mut report = LocationReport::new(1.0, 2.0)
            .accuracy("3.5")
            .timestamp(DateTime::from_timestamp(1_600_000_000, 0).unwrap())
            .battery("80")
            .wifi_state("1");
        report.wssid = Some("home".to_string());
        report.build = Some("300000".to_string());

        let context = report.user_context(now());
        assert_eq!(context["geolocation"]["lat"], "1");
        assert_eq!(context["geolocation"]["accuracy"], "3.5");
        assert_eq!(context["geolocation"]["timestamp"], "1600000000");
        assert_eq!(context["geolocation_meta"]["wssid"], "home");
        assert_eq!(context["device"]["battery"], "80");
        assert_eq!(context["device"]["wifi_state"], "1");
        assert_eq!(context["device"]["build"], "300000");
    }

    #[test]
    fn test_header_is_base64_json() {
        let report = LocationReport::new(40.5, -74.25);
        let decoded = STANDARD.decode(report.user_context_header(now())).unwrap();
        let value: Value = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(value, report.user_context(now()));
    }
}
