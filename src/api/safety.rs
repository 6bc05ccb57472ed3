//
//  life360-client
//  api/safety.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Crime, offender and safety point endpoints.
//!
//! Area filters take coordinates in any shape accepted by
//! [`extract_lat_lon`]: `[lat, lon]` pairs, `{"lat": .., "lng": ..}`
//! objects and so on.
//!
//! # Example
//!
//! ```rust,no_run
//! use life360_client::api::{CrimeQuery, Life360Client};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), life360_client::api::ApiError> {
//! let client = Life360Client::new()?;
//! let query = CrimeQuery::new()
//!     .top_left(json!([40.80, -74.05]))
//!     .bottom_right(json!({"latitude": 40.70, "longitude": -73.90}))
//!     .page_size(50);
//!
//! for crime in &client.list_crimes(&query).await? {
//!     println!("{:?}: {:?}", crime.kind, crime.address);
//! }
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::circles::items;
use super::{ApiError, Life360Client, QueryParams, RequestOptions};
use crate::model::{
    extract_lat_lon, Crime, Offender, ResourceList, SafetyPoint, SAFETY_POINT_LOCATION_TYPE,
};

/// Corners of the area to search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundingBox {
    /// North-west corner, in any coordinate shape.
    pub top_left: Option<Value>,
    /// South-east corner, in any coordinate shape.
    pub bottom_right: Option<Value>,
}

impl BoundingBox {
    /// Appends the `boundingBox[...]` parameters for the corners that are set.
    fn push_params(&self, pairs: &mut Vec<(String, String)>) -> Result<(), ApiError> {
        for (prefix, corner) in [("topLeft", &self.top_left), ("bottomRight", &self.bottom_right)] {
            if let Some(corner) = corner {
                let point = extract_lat_lon(corner)?;
                pairs.push((format!("boundingBox[{prefix}Latitude]"), point.lat.to_string()));
                pairs.push((format!("boundingBox[{prefix}Longitude]"), point.lon.to_string()));
            }
        }
        Ok(())
    }
}

/// Filters for [`Life360Client::list_crimes`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrimeQuery {
    /// Earliest incident date.
    pub start: Option<DateTime<Utc>>,
    /// Latest incident date.
    pub end: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub area: BoundingBox,
}

impl CrimeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn top_left(mut self, corner: Value) -> Self {
        self.area.top_left = Some(corner);
        self
    }

    pub fn bottom_right(mut self, corner: Value) -> Self {
        self.area.bottom_right = Some(corner);
        self
    }

    /// Query parameters for this filter; dates are sent as epoch seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Coordinates`] when a corner cannot be resolved.
    pub fn to_params(&self) -> Result<QueryParams, ApiError> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start {
            pairs.push(("startDate".to_string(), start.timestamp().to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("endDate".to_string(), end.timestamp().to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize".to_string(), page_size.to_string()));
        }
        self.area.push_params(&mut pairs)?;
        Ok(QueryParams::Pairs(pairs))
    }
}

/// Filters for [`Life360Client::list_offenders`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffenderQuery {
    /// Maximum number of offenders to return.
    pub limit: Option<u32>,
    pub area: BoundingBox,
}

impl OffenderQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn top_left(mut self, corner: Value) -> Self {
        self.area.top_left = Some(corner);
        self
    }

    pub fn bottom_right(mut self, corner: Value) -> Self {
        self.area.bottom_right = Some(corner);
        self
    }

    /// Query parameters for this filter.
    pub fn to_params(&self) -> Result<QueryParams, ApiError> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        self.area.push_params(&mut pairs)?;
        Ok(QueryParams::Pairs(pairs))
    }
}

impl Life360Client {
    /// Lists reported crimes matching `query`.
    pub async fn list_crimes(&self, query: &CrimeQuery) -> Result<ResourceList<Crime>, ApiError> {
        let options = RequestOptions::new().params(query.to_params()?);
        let json = self.execute_json("/v3/crimes", &options).await?;
        Ok(ResourceList::from_raw_items(items(&json, "crimes")?))
    }

    /// Lists registered offenders matching `query`.
    pub async fn list_offenders(
        &self,
        query: &OffenderQuery,
    ) -> Result<ResourceList<Offender>, ApiError> {
        let options = RequestOptions::new().params(query.to_params()?);
        let json = self.execute_json("/v3/offenders", &options).await?;
        Ok(ResourceList::from_raw_items(items(&json, "offenders")?))
    }

    /// Lists safety points, optionally around a center point.
    ///
    /// Every returned point has `location_type` set to `"safetyPoint"`.
    ///
    /// # Parameters
    ///
    /// * `center` - Center of the search, in any coordinate shape
    pub async fn list_safety_points(
        &self,
        center: Option<&Value>,
    ) -> Result<ResourceList<SafetyPoint>, ApiError> {
        let mut options = RequestOptions::new();
        if let Some(center) = center {
            let point = extract_lat_lon(center)?;
            options = options.params(QueryParams::pairs([
                ("centerPoint[latitude]", point.lat.to_string()),
                ("centerPoint[longitude]", point.lon.to_string()),
            ]));
        }

        let json = self.execute_json("/v3/safetyPoints", &options).await?;
        let mut points: ResourceList<SafetyPoint> =
            ResourceList::from_raw_items(items(&json, "safetyPoints")?);
        for point in points.iter_mut() {
            point.location_type = Some(SAFETY_POINT_LOCATION_TYPE.to_string());
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_crime_params() {
        let query = CrimeQuery::new()
            .start(Utc.timestamp_opt(1_600_000_000, 0).unwrap())
            .page(2)
            .page_size(25)
            .top_left(json!([40.80, -74.05]))
            .bottom_right(json!({"lat": "40.7", "lng": "-73.9"}));

        assert_eq!(
            query.to_params().unwrap().encode(),
            "startDate=1600000000&page=2&pageSize=25\
             &boundingBox%5BtopLeftLatitude%5D=40.8&boundingBox%5BtopLeftLongitude%5D=-74.05\
             &boundingBox%5BbottomRightLatitude%5D=40.7&boundingBox%5BbottomRightLongitude%5D=-73.9"
        );
    }

    #[test]
    fn test_empty_queries() {
        assert_eq!(CrimeQuery::new().to_params().unwrap().encode(), "");
        assert_eq!(OffenderQuery::new().limit(5).to_params().unwrap().encode(), "limit=5");
    }

    #[test]
    fn test_bad_corner_is_a_coordinate_error() {
        let query = OffenderQuery::new().top_left(json!({"lat": 1}));
        assert!(matches!(query.to_params(), Err(ApiError::Coordinates(_))));
    }
}
