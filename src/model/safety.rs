//
//  life360-client
//  model/safety.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Neighbourhood safety data: crime reports, registered offenders and
//! safety points.
//!
//! Crime and safety point ids arrive as digit strings and are stored as
//! integer ids, so `find_by_id(1234)` matches `"id": "1234"`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::coerce::Loose;
use super::coordinates::LatLon;
use super::{Fields, Populate, Resource, ResourceId};

/// Location type assigned to entries listed from the safety points endpoint.
pub const SAFETY_POINT_LOCATION_TYPE: &str = "safetyPoint";

fn lat_lon(latitude: &Option<Loose<f64>>, longitude: &Option<Loose<f64>>) -> Option<LatLon> {
    let lat = latitude.as_ref()?.get()?;
    let lon = longitude.as_ref()?.get()?;
    Some(LatLon::new(lat, lon))
}

/// A reported crime incident.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Crime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_date: Option<Loose<DateTime<Utc>>>,

    /// Same date under the snake_case key some payloads use.
    #[serde(rename = "incident_date", skip_serializing_if = "Option::is_none")]
    pub incident_date_alt: Option<Loose<DateTime<Utc>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Loose<f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Loose<f64>>,

    /// Category of the incident (`Theft`, `Assault`, ...).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Crime {
    /// Incident date from whichever key the payload used.
    pub fn date(&self) -> Option<&Loose<DateTime<Utc>>> {
        self.incident_date.as_ref().or(self.incident_date_alt.as_ref())
    }

    pub fn lat_lon(&self) -> Option<LatLon> {
        lat_lon(&self.latitude, &self.longitude)
    }
}

impl Populate for Crime {
    fn populate(&mut self, raw: &Map<String, Value>) {
        let mut fields = Fields::new(raw);
        fields.int_id("id", &mut self.id);
        fields.timestamp("incidentDate", &mut self.incident_date);
        fields.timestamp("incident_date", &mut self.incident_date_alt);
        fields.float("latitude", &mut self.latitude);
        fields.float("longitude", &mut self.longitude);
        fields.text("type", &mut self.kind);
        fields.text("description", &mut self.description);
        fields.text("address", &mut self.address);
        fields.finish(&mut self.extra);
    }
}

impl Resource for Crime {
    fn id(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }

    /// Crimes are matched by type and description.
    fn names(&self) -> Vec<String> {
        [&self.kind, &self.description]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// A registered offender living near a location.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offender {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<Loose<i64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Loose<i64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Loose<f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Loose<f64>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Offender {
    pub fn lat_lon(&self) -> Option<LatLon> {
        lat_lon(&self.latitude, &self.longitude)
    }
}

impl Populate for Offender {
    fn populate(&mut self, raw: &Map<String, Value>) {
        let mut fields = Fields::new(raw);
        fields.id("id", &mut self.id);
        fields.text("name", &mut self.name);
        fields.text("fullName", &mut self.full_name);
        fields.int("age", &mut self.age);
        fields.int("weight", &mut self.weight);
        fields.float("latitude", &mut self.latitude);
        fields.float("longitude", &mut self.longitude);
        fields.finish(&mut self.extra);
    }
}

impl Resource for Offender {
    fn id(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }

    fn names(&self) -> Vec<String> {
        [&self.name, &self.full_name]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// A point of interest from the safety points endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub incident_date: Option<Loose<DateTime<Utc>>>,

    #[serde(rename = "incident_date", skip_serializing_if = "Option::is_none")]
    pub incident_date_alt: Option<Loose<DateTime<Utc>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Loose<f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Loose<f64>>,

    /// Set by the listing code to [`SAFETY_POINT_LOCATION_TYPE`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SafetyPoint {
    pub fn date(&self) -> Option<&Loose<DateTime<Utc>>> {
        self.incident_date.as_ref().or(self.incident_date_alt.as_ref())
    }

    pub fn lat_lon(&self) -> Option<LatLon> {
        lat_lon(&self.latitude, &self.longitude)
    }
}

impl Populate for SafetyPoint {
    fn populate(&mut self, raw: &Map<String, Value>) {
        let mut fields = Fields::new(raw);
        fields.int_id("id", &mut self.id);
        fields.text("name", &mut self.name);
        fields.timestamp("incidentDate", &mut self.incident_date);
        fields.timestamp("incident_date", &mut self.incident_date_alt);
        fields.float("latitude", &mut self.latitude);
        fields.float("longitude", &mut self.longitude);
        fields.text("locationType", &mut self.location_type);
        fields.finish(&mut self.extra);
    }
}

impl Resource for SafetyPoint {
    fn id(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }

    fn names(&self) -> Vec<String> {
        self.name.iter().cloned().collect()
    }

    fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}
