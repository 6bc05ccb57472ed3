//
//  life360-client
//  model/member.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Circle members and their nested settings.
//!
//! A member is listed by a circle. The member keeps the circle's id in
//! [`Member::circle_id`] so follow-up requests (history, location requests,
//! refresh) can be built without holding the circle itself.
//!
//! # Payload Shape
//!
//! ```text
//! Member
//! ├── id, firstName, lastName, loginEmail, loginPhone, avatar
//! ├── created, createdAt          (timestamps)
//! ├── isAdmin                     (bool)
//! ├── location                    (Location)
//! ├── features                    (bool flags + shareOffTimestamp)
//! ├── settings
//! │   ├── alerts                  (bool flags)
//! │   └── map                     (bool flags)
//! └── issues                      (bool flags)
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::coerce::Loose;
use super::location::Location;
use super::{Fields, Populate, Resource, ResourceId};

/// A member of a circle.
///
/// # Example
///
/// ```rust
/// use life360_client::model::{Member, Resource};
/// use serde_json::json;
///
/// let member = Member::from_raw(&json!({
///     "id": "m-1",
///     "firstName": "Grace",
///     "lastName": "Hopper",
///     "isAdmin": "1",
///     "features": {"shareLocation": "1", "shareOffTimestamp": null},
///     "location": {"latitude": "38.9", "longitude": "-77.0", "battery": "64"}
/// }));
///
/// assert_eq!(member.full_name().as_deref(), Some("Grace Hopper"));
/// assert_eq!(member.is_admin.as_ref().and_then(|a| a.get()), Some(true));
/// assert!(member.location.as_ref().and_then(|l| l.lat_lon()).is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Upstream member id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_phone: Option<String>,

    /// Avatar image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Loose<DateTime<Utc>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Loose<DateTime<Utc>>>,

    /// Whether the member administers the circle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<Loose<bool>>,

    /// Latest known location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<MemberFeatures>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<MemberSettings>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<MemberIssues>,

    /// Id of the circle this member was listed by.
    ///
    /// Set by the listing code, never read from the payload.
    #[serde(skip)]
    pub circle_id: Option<ResourceId>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Member {
    /// First and last name joined by a space, skipping missing parts.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

impl Populate for Member {
    fn populate(&mut self, raw: &Map<String, Value>) {
        let mut fields = Fields::new(raw);
        fields.id("id", &mut self.id);
        fields.text("firstName", &mut self.first_name);
        fields.text("lastName", &mut self.last_name);
        fields.text("loginEmail", &mut self.login_email);
        fields.text("loginPhone", &mut self.login_phone);
        fields.text("avatar", &mut self.avatar);

        fields.timestamp("created", &mut self.created);
        fields.timestamp("createdAt", &mut self.created_at);
        fields.bool("isAdmin", &mut self.is_admin);

        fields.nested("location", &mut self.location);
        fields.nested("features", &mut self.features);
        fields.nested("settings", &mut self.settings);
        fields.nested("issues", &mut self.issues);
        fields.finish(&mut self.extra);
    }
}

impl Resource for Member {
    fn id(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }

    /// First name, last name and the full name, in that order.
    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = [&self.first_name, &self.last_name]
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        if let Some(full) = self.full_name() {
            names.push(full);
        }
        names
    }

    fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// Feature flags attached to a member.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberFeatures {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disconnected: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geofencing: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_display: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_smartphone_locating: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_invite: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_location: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smartphone: Option<Loose<bool>>,
    /// When location sharing was switched off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_off_timestamp: Option<Loose<DateTime<Utc>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Populate for MemberFeatures {
    fn populate(&mut self, raw: &Map<String, Value>) {
        let mut fields = Fields::new(raw);
        fields.bool("device", &mut self.device);
        fields.bool("disconnected", &mut self.disconnected);
        fields.bool("geofencing", &mut self.geofencing);
        fields.bool("mapDisplay", &mut self.map_display);
        fields.bool("nonSmartphoneLocating", &mut self.non_smartphone_locating);
        fields.bool("pendingInvite", &mut self.pending_invite);
        fields.bool("shareLocation", &mut self.share_location);
        fields.bool("smartphone", &mut self.smartphone);
        fields.timestamp("shareOffTimestamp", &mut self.share_off_timestamp);
        fields.finish(&mut self.extra);
    }
}

/// Notification and display preferences of a member.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alerts: Option<AlertSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measure: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Populate for MemberSettings {
    fn populate(&mut self, raw: &Map<String, Value>) {
        let mut fields = Fields::new(raw);
        fields.nested("alerts", &mut self.alerts);
        fields.nested("map", &mut self.map);
        fields.text("dateFormat", &mut self.date_format);
        fields.text("locale", &mut self.locale);
        fields.text("timeZone", &mut self.time_zone);
        fields.text("unitOfMeasure", &mut self.unit_of_measure);
        fields.finish(&mut self.extra);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crime: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<Loose<bool>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Populate for AlertSettings {
    fn populate(&mut self, raw: &Map<String, Value>) {
        let mut fields = Fields::new(raw);
        fields.bool("crime", &mut self.crime);
        fields.bool("sound", &mut self.sound);
        fields.finish(&mut self.extra);
    }
}

/// Map layers the member has switched on.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisor: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crime: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fire: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_radius: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_radius: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub police: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex_offenders: Option<Loose<bool>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Populate for MapSettings {
    fn populate(&mut self, raw: &Map<String, Value>) {
        let mut fields = Fields::new(raw);
        fields.bool("advisor", &mut self.advisor);
        fields.bool("crime", &mut self.crime);
        fields.bool("family", &mut self.family);
        fields.bool("fire", &mut self.fire);
        fields.bool("hospital", &mut self.hospital);
        fields.bool("memberRadius", &mut self.member_radius);
        fields.bool("placeRadius", &mut self.place_radius);
        fields.bool("police", &mut self.police);
        fields.bool("sexOffenders", &mut self.sex_offenders);
        fields.finish(&mut self.extra);
    }
}

/// Connectivity problems reported for a member's device.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemberIssues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disconnected: Option<Loose<bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub troubleshooting: Option<Loose<bool>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Populate for MemberIssues {
    fn populate(&mut self, raw: &Map<String, Value>) {
        let mut fields = Fields::new(raw);
        fields.bool("disconnected", &mut self.disconnected);
        fields.bool("troubleshooting", &mut self.troubleshooting);
        fields.finish(&mut self.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "id": "5f2c",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "createdAt": "1500000000",
            "isAdmin": "0",
            "pinNumber": null,
            "features": {
                "device": "1",
                "pendingInvite": "0",
                "shareOffTimestamp": "1500000000",
                "smartphone": "maybe"
            },
            "settings": {
                "alerts": {"crime": "1", "sound": "0"},
                "map": {"police": "yes", "crimeDuration": "sixmo"},
                "unitOfMeasure": "i"
            },
            "issues": {"disconnected": "0", "title": null}
        })
    }

    #[test]
    fn test_populate_nested_structures() {
        let member = Member::from_raw(&sample());
        assert_eq!(member.id, Some(ResourceId::from("5f2c")));
        assert_eq!(member.is_admin, Some(Loose::Typed(false)));

        let features = member.features.as_ref().unwrap();
        assert_eq!(features.device, Some(Loose::Typed(true)));
        assert_eq!(features.pending_invite, Some(Loose::Typed(false)));
        assert_eq!(features.smartphone, Some(Loose::Raw(json!("maybe"))));
        assert!(features.share_off_timestamp.as_ref().unwrap().is_typed());

        let settings = member.settings.as_ref().unwrap();
        let alerts = settings.alerts.as_ref().unwrap();
        assert_eq!(alerts.crime, Some(Loose::Typed(true)));
        assert_eq!(alerts.sound, Some(Loose::Typed(false)));
        let map = settings.map.as_ref().unwrap();
        assert_eq!(map.police, Some(Loose::Typed(true)));
        assert_eq!(map.extra.get("crimeDuration"), Some(&json!("sixmo")));
        assert_eq!(settings.unit_of_measure.as_deref(), Some("i"));

        assert_eq!(
            member.issues.as_ref().unwrap().disconnected,
            Some(Loose::Typed(false))
        );
        assert_eq!(member.extra.get("pinNumber"), Some(&Value::Null));
    }

    #[test]
    fn test_names_include_full_name() {
        let member = Member::from_raw(&sample());
        assert_eq!(member.names(), vec!["Ada", "Lovelace", "Ada Lovelace"]);

        let only_first = Member::from_raw(&json!({"firstName": "Cher"}));
        assert_eq!(only_first.names(), vec!["Cher", "Cher"]);
        assert!(Member::default().names().is_empty());
    }

    #[test]
    fn test_refresh_keeps_nested_fields() {
        let mut member = Member::from_raw(&sample());
        member.populate(json!({"features": {"device": "0"}}).as_object().unwrap());
        let features = member.features.as_ref().unwrap();
        assert_eq!(features.device, Some(Loose::Typed(false)));
        assert_eq!(features.pending_invite, Some(Loose::Typed(false)));
        assert_eq!(member.first_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_circle_id_is_not_read_from_payload() {
        let member = Member::from_raw(&json!({"id": 1, "circle_id": "c"}));
        assert!(member.circle_id.is_none());
        assert_eq!(member.extra.get("circle_id"), Some(&json!("c")));
    }
}
