//
//  life360-client
//  api/circles.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Circle, member, history, place and location request endpoints.
//!
//! # Example
//!
//! ```rust,no_run
//! use life360_client::api::Life360Client;
//!
//! # async fn example() -> Result<(), life360_client::api::ApiError> {
//! let mut client = Life360Client::new()?;
//! client.login("user@example.com", "secret").await?;
//!
//! let circles = client.list_circles().await?;
//! if let Some(family) = circles.find_by_name("family") {
//!     let family = client.circle(family.id.as_ref().unwrap()).await?;
//!     for member in &family.members {
//!         println!("{:?} at {:?}", member.full_name(), member.location.as_ref().and_then(|l| l.lat_lon()));
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::{ApiError, Life360Client, QueryParams, RequestOptions};
use crate::model::{
    Circle, Location, Member, MemberRequest, Place, Populate, RequestKind, Resource, ResourceId,
    ResourceList,
};

/// Returns the array stored under `key`.
pub(crate) fn items<'a>(json: &'a Value, key: &str) -> Result<&'a [Value], ApiError> {
    json.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| ApiError::MissingField(key.to_string()))
}

fn require<'a>(id: Option<&'a ResourceId>, field: &str) -> Result<&'a ResourceId, ApiError> {
    id.ok_or_else(|| ApiError::MissingField(field.to_string()))
}

fn circle_path(circle_id: &ResourceId) -> String {
    format!("/v3/circles/{circle_id}")
}

fn member_path(circle_id: &ResourceId, member_id: &ResourceId) -> String {
    format!("/v3/circles/{circle_id}/members/{member_id}")
}

impl Life360Client {
    /// Lists the circles of the logged-in user.
    ///
    /// Circles in this listing usually carry no members; use
    /// [`circle`](Self::circle) or [`refresh_circle`](Self::refresh_circle)
    /// to load them.
    pub async fn list_circles(&self) -> Result<ResourceList<Circle>, ApiError> {
        let json = self.execute_json("/v3/circles", &RequestOptions::new()).await?;
        Ok(ResourceList::from_raw_items(items(&json, "circles")?))
    }

    /// Fetches one circle with its members.
    pub async fn circle(&self, circle_id: &ResourceId) -> Result<Circle, ApiError> {
        let json = self
            .execute_json(&circle_path(circle_id), &RequestOptions::new())
            .await?;
        Ok(Circle::from_raw(&json))
    }

    /// Re-populates `circle` from the server.
    ///
    /// Fields missing from the response keep their values; a members array
    /// in the response replaces the member list.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingField`] when the circle has no id.
    pub async fn refresh_circle(&self, circle: &mut Circle) -> Result<(), ApiError> {
        let path = circle_path(require(circle.id.as_ref(), "id")?);
        let json = self.execute_json(&path, &RequestOptions::new()).await?;
        if let Some(object) = json.as_object() {
            circle.populate(object);
        }
        Ok(())
    }

    /// Lists the members of `circle`, each pointing back at the circle.
    pub async fn list_members(&self, circle: &Circle) -> Result<ResourceList<Member>, ApiError> {
        let circle_id = require(circle.id.as_ref(), "id")?;
        let path = format!("{}/members", circle_path(circle_id));
        let json = self.execute_json(&path, &RequestOptions::new()).await?;

        let mut members: ResourceList<Member> = ResourceList::from_raw_items(items(&json, "members")?);
        for member in members.iter_mut() {
            member.circle_id = Some(circle_id.clone());
        }
        Ok(members)
    }

    /// Fetches one member of a circle.
    pub async fn member(
        &self,
        circle_id: &ResourceId,
        member_id: &ResourceId,
    ) -> Result<Member, ApiError> {
        let json = self
            .execute_json(&member_path(circle_id, member_id), &RequestOptions::new())
            .await?;
        let mut member = Member::from_raw(&json);
        member.circle_id = Some(circle_id.clone());
        Ok(member)
    }

    /// Re-populates `member` from the server.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingField`] when the member has no id or no
    /// circle back-reference.
    pub async fn refresh_member(&self, member: &mut Member) -> Result<(), ApiError> {
        let path = member_path(
            require(member.circle_id.as_ref(), "circle_id")?,
            require(member.id.as_ref(), "id")?,
        );
        let json = self.execute_json(&path, &RequestOptions::new()).await?;
        if let Some(object) = json.as_object() {
            member.populate(object);
        }
        Ok(())
    }

    /// Location history of one member.
    ///
    /// # Parameters
    ///
    /// * `member` - A member with `id` and `circle_id`
    /// * `time` - Point in time to read the history at; the latest when `None`
    pub async fn member_history(
        &self,
        member: &Member,
        time: Option<DateTime<Utc>>,
    ) -> Result<ResourceList<Location>, ApiError> {
        let path = format!(
            "{}/history",
            member_path(
                require(member.circle_id.as_ref(), "circle_id")?,
                require(member.id.as_ref(), "id")?,
            )
        );
        let mut options = RequestOptions::new();
        if let Some(time) = time {
            options = options.params(QueryParams::pairs([("time", time.timestamp().to_string())]));
        }

        let json = self.execute_json(&path, &options).await?;
        Ok(ResourceList::from_raw_items(items(&json, "locations")?))
    }

    /// Location history of every member of a circle.
    ///
    /// # Parameters
    ///
    /// * `circle` - A circle with an id
    /// * `since` - Only return locations after this time
    pub async fn circle_history(
        &self,
        circle: &Circle,
        since: Option<DateTime<Utc>>,
    ) -> Result<ResourceList<Location>, ApiError> {
        let path = format!(
            "{}/members/history",
            circle_path(require(circle.id.as_ref(), "id")?)
        );
        let mut options = RequestOptions::new();
        if let Some(since) = since {
            options = options.params(QueryParams::pairs([("since", since.timestamp().to_string())]));
        }

        let json = self.execute_json(&path, &options).await?;
        Ok(ResourceList::from_raw_items(items(&json, "locations")?))
    }

    /// Every saved place of a circle.
    pub async fn all_places(&self, circle: &Circle) -> Result<ResourceList<Place>, ApiError> {
        let path = format!("{}/allplaces", circle_path(require(circle.id.as_ref(), "id")?));
        let json = self.execute_json(&path, &RequestOptions::new()).await?;
        Ok(ResourceList::from_raw_items(items(&json, "places")?))
    }

    /// Asks a member's device to report its location.
    ///
    /// Poll the returned request with [`check_request`](Self::check_request).
    pub async fn request_location(&self, member: &Member) -> Result<MemberRequest, ApiError> {
        self.send_member_request(member, RequestKind::Location).await
    }

    /// Asks a member to check in.
    pub async fn request_check_in(&self, member: &Member) -> Result<MemberRequest, ApiError> {
        self.send_member_request(member, RequestKind::CheckIn).await
    }

    async fn send_member_request(
        &self,
        member: &Member,
        kind: RequestKind,
    ) -> Result<MemberRequest, ApiError> {
        let circle_id = require(member.circle_id.as_ref(), "circle_id")?;
        let member_id = require(member.id.as_ref(), "id")?;
        let path = format!("{}/request", member_path(circle_id, member_id));
        let options = RequestOptions::new()
            .method("POST")
            .body(json!({ "type": kind.as_str() }));

        let json = self.execute_json(&path, &options).await?;
        let mut request = MemberRequest::from_response(kind, &json);
        request.member_id = Some(member_id.clone());
        request.circle_id = Some(circle_id.clone());
        tracing::debug!("Sent {} request to member {}", kind, member_id);
        Ok(request)
    }

    /// Polls a location or check-in request.
    ///
    /// # Returns
    ///
    /// `true` once the device has answered; the reported location is then
    /// stored in `request.location`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingField`] when the request has no
    /// `requestId`.
    pub async fn check_request(&self, request: &mut MemberRequest) -> Result<bool, ApiError> {
        let request_id = request
            .request_id
            .as_deref()
            .ok_or_else(|| ApiError::MissingField("requestId".to_string()))?;
        let path = format!("/v3/circles/members/request/{request_id}");

        let json = self.execute_json(&path, &RequestOptions::new()).await?;
        if let Some(object) = json.as_object() {
            request.populate(object);
        }
        Ok(request.is_answered())
    }
}
