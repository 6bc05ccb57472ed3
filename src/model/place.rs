//
//  life360-client
//  model/place.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use serde::Serialize;
use serde_json::{Map, Value};

use super::coerce::Loose;
use super::coordinates::LatLon;
use super::{Fields, Populate, Resource, ResourceId};

/// A saved place (geofence) of a circle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Place {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Loose<f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Loose<f64>>,

    /// Geofence radius in meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<Loose<f64>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Place {
    /// Center of the place when both components are numeric.
    pub fn lat_lon(&self) -> Option<LatLon> {
        let lat = self.latitude.as_ref()?.get()?;
        let lon = self.longitude.as_ref()?.get()?;
        Some(LatLon::new(lat, lon))
    }
}

impl Populate for Place {
    fn populate(&mut self, raw: &Map<String, Value>) {
        let mut fields = Fields::new(raw);
        fields.id("id", &mut self.id);
        fields.text("name", &mut self.name);
        fields.float("latitude", &mut self.latitude);
        fields.float("longitude", &mut self.longitude);
        fields.float("radius", &mut self.radius);
        fields.finish(&mut self.extra);
    }
}

impl Resource for Place {
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_place_coordinates() {
        let place = Place::from_raw(&json!({
            "id": "p-1",
            "name": "Office",
            "latitude": "52.52",
            "longitude": "13,40",
            "radius": "150",
            "ownerId": "m-1"
        }));
        assert_eq!(place.lat_lon(), Some(LatLon::new(52.52, 13.40)));
        assert_eq!(place.radius, Some(Loose::Typed(150.0)));
        assert_eq!(place.extra.get("ownerId"), Some(&json!("m-1")));
    }

    #[test]
    fn test_place_without_numeric_coordinates() {
        let place = Place::from_raw(&json!({"latitude": "n/a", "longitude": 1}));
        assert!(place.lat_lon().is_none());
        assert_eq!(place.latitude, Some(Loose::Raw(json!("n/a"))));
    }
}
