//
//  life360-client
//  model/circle.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Circles: the groups members share their location with.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::coerce::Loose;
use super::member::Member;
use super::{Fields, Populate, Resource, ResourceId, ResourceList};

/// A Life360 circle and, when the payload includes them, its members.
///
/// Members listed by a circle carry the circle's id in
/// [`Member::circle_id`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    /// Upstream circle id (a UUID).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,

    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Color tag chosen for the circle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Circle type as reported upstream (`basic`, ...).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Loose<DateTime<Utc>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_count: Option<Loose<i64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_messages: Option<Loose<i64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_notifications: Option<Loose<i64>>,

    /// Subscription features of the circle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<CircleFeatures>,

    /// Members of the circle, in payload order.
    #[serde(skip_serializing_if = "ResourceList::is_empty")]
    pub members: ResourceList<Member>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Circle {
    /// Points every member's back-reference at this circle.
    ///
    /// Population does this already; call it after editing `members` or
    /// `id` by hand.
    pub fn link_members(&mut self) {
        for member in self.members.iter_mut() {
            member.circle_id = self.id.clone();
        }
    }
}

impl Populate for Circle {
    fn populate(&mut self, raw: &Map<String, Value>) {
        let mut fields = Fields::new(raw);
        fields.id("id", &mut self.id);
        fields.text("name", &mut self.name);
        fields.text("color", &mut self.color);
        fields.text("type", &mut self.kind);
        fields.timestamp("createdAt", &mut self.created_at);
        fields.int("memberCount", &mut self.member_count);
        fields.int("unreadMessages", &mut self.unread_messages);
        fields.int("unreadNotifications", &mut self.unread_notifications);
        fields.nested("features", &mut self.features);

        // A members array replaces the previous list wholesale.
        if let Some(items) = fields.array("members") {
            self.members.clear_children();
            for item in items {
                self.members.add_child(Member::from_raw(item));
            }
        }
        fields.finish(&mut self.extra);
        self.link_members();
    }
}

impl Resource for Circle {
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

/// Subscription details of a circle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleFeatures {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium: Option<Loose<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_month: Option<Loose<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_year: Option<Loose<i64>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Populate for CircleFeatures {
    fn populate(&mut self, raw: &Map<String, Value>) {
        let mut fields = Fields::new(raw);
        fields.int("premium", &mut self.premium);
        fields.int("priceMonth", &mut self.price_month);
        fields.int("priceYear", &mut self.price_year);
        fields.finish(&mut self.extra);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn family() -> Value {
        json!({
            "id": "c-1",
            "name": "Family",
            "color": "f05a28",
            "type": "basic",
            "createdAt": "1500000000",
            "memberCount": "2",
            "unreadMessages": "0",
            "unreadNotifications": "3",
            "features": {"premium": "0", "priceMonth": "299", "priceYear": "2999", "locationUpdatesLeft": 0},
            "members": [
                {"id": "m-1", "firstName": "Ada", "lastName": "Lovelace"},
                {"id": "m-2", "firstName": "Alan", "lastName": "Turing"}
            ]
        })
    }

    #[test]
    fn test_populate_coerces_counts_and_features() {
        let circle = Circle::from_raw(&family());
        assert_eq!(circle.kind.as_deref(), Some("basic"));
        assert_eq!(circle.member_count, Some(Loose::Typed(2)));
        assert_eq!(circle.unread_notifications, Some(Loose::Typed(3)));
        assert!(circle.created_at.as_ref().unwrap().is_typed());

        let features = circle.features.as_ref().unwrap();
        assert_eq!(features.price_month, Some(Loose::Typed(299)));
        assert_eq!(features.extra.get("locationUpdatesLeft"), Some(&json!(0)));
    }

    #[test]
    fn test_members_carry_circle_id() {
        let circle = Circle::from_raw(&family());
        assert_eq!(circle.members.len(), 2);
        for member in &circle.members {
            assert_eq!(member.circle_id, Some(ResourceId::from("c-1")));
        }
        assert!(!circle.extra.contains_key("members"));
    }

    #[test]
    fn test_refresh_replaces_members() {
        let mut circle = Circle::from_raw(&family());
        circle.populate(
            json!({"members": [{"id": "m-3", "firstName": "Grace"}]})
                .as_object()
                .unwrap(),
        );
        assert_eq!(circle.members.len(), 1);
        assert!(circle.members.find_by_id("m-1").is_none());
        assert_eq!(
            circle.members.find_by_id("m-3").unwrap().circle_id,
            Some(ResourceId::from("c-1"))
        );
        assert_eq!(circle.name.as_deref(), Some("Family"));
    }

    #[test]
    fn test_refresh_without_members_keeps_list() {
        let mut circle = Circle::from_raw(&family());
        circle.populate(json!({"name": "Kin"}).as_object().unwrap());
        assert_eq!(circle.members.len(), 2);
        assert_eq!(circle.names(), vec!["Kin"]);
    }
}
