//
//  life360-client
//  model/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Location and check-in requests sent to a member's device.
//!
//! A request is created by POSTing to the member's `request` endpoint and is
//! then polled until the device answers. The status `"A"` marks a request
//! that has been answered; the answer's location is stored on the request.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::coerce::Loose;
use super::location::Location;
use super::{Fields, Populate, Resource, ResourceId};

/// Status reported once the device has answered the request.
pub const STATUS_ANSWERED: &str = "A";

/// What the member's device is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// Report the current location.
    Location,
    /// Ask the member to check in.
    CheckIn,
}

impl RequestKind {
    /// The `type` value sent in the request body.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::CheckIn => "checkin",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pending or answered request addressed to a member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRequest {
    /// Id used to poll the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pollable: Option<Loose<bool>>,

    /// Latest status reported by the poll endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    pub kind: RequestKind,

    /// Member the request was sent to.
    #[serde(skip)]
    pub member_id: Option<ResourceId>,

    /// Circle the member was addressed through.
    #[serde(skip)]
    pub circle_id: Option<ResourceId>,

    /// Location reported by the device once answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MemberRequest {
    /// Creates an empty request of the given kind.
    pub fn new(kind: RequestKind) -> Self {
        Self {
            request_id: None,
            is_pollable: None,
            status: None,
            kind,
            member_id: None,
            circle_id: None,
            location: None,
            extra: Map::new(),
        }
    }

    /// Builds a request of `kind` from the creation response.
    pub fn from_response(kind: RequestKind, raw: &Value) -> Self {
        let mut request = Self::new(kind);
        if let Some(object) = raw.as_object() {
            request.populate(object);
        }
        request
    }

    /// Returns `true` once the device has answered.
    pub fn is_answered(&self) -> bool {
        self.status.as_deref() == Some(STATUS_ANSWERED)
    }
}

impl Populate for MemberRequest {
    fn populate(&mut self, raw: &Map<String, Value>) {
        let mut fields = Fields::new(raw);
        fields.text("requestId", &mut self.request_id);
        fields.bool("isPollable", &mut self.is_pollable);
        fields.text("status", &mut self.status);
        fields.nested("location", &mut self.location);
        fields.finish(&mut self.extra);
    }
}

impl Resource for MemberRequest {
    fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_response() {
        let request = MemberRequest::from_response(
            RequestKind::CheckIn,
            &json!({"requestId": "r-1", "isPollable": "1"}),
        );
        assert_eq!(request.request_id.as_deref(), Some("r-1"));
        assert_eq!(request.is_pollable, Some(Loose::Typed(true)));
        assert_eq!(request.kind.as_str(), "checkin");
        assert!(!request.is_answered());
    }

    #[test]
    fn test_answered_poll_sets_location() {
        let mut request = MemberRequest::new(RequestKind::Location);
        request.populate(
            json!({"status": "A", "location": {"latitude": "1", "longitude": "2"}})
                .as_object()
                .unwrap(),
        );
        assert!(request.is_answered());
        assert!(request.location.as_ref().unwrap().lat_lon().is_some());
    }
}
