//
//  life360-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP client for the Life360 REST API and the
//! endpoint methods built on top of it.
//!
//! ## Architecture
//!
//! The API layer is organized as follows:
//!
//! - [`client`]: Core HTTP client holding configuration and session
//! - [`request`]: Loose request options and their resolution into a request
//! - [`response`]: Content-type aware decoding and failure classification
//! - [`common`]: Shared error type
//!
//! Endpoint methods (login, circles, members, history, places, location
//! requests, location reports, crimes, offenders and safety points) are added to
//! [`Life360Client`] by private submodules.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use life360_client::api::Life360Client;
//!
//! # async fn example() -> Result<(), life360_client::api::ApiError> {
//! let mut client = Life360Client::new()?;
//! client.login("user@example.com", "secret").await?;
//!
//! for circle in &client.list_circles().await? {
//!     println!("{:?}", circle.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is an [`ApiError`]:
//!
//! - `Transport`: the server answered with a status other than 200
//! - `Api`: a 200 response carried an `errorMessage`
//! - `Network`: the exchange itself failed
//! - `Decoding`: a body declared as JSON did not parse
//! - `Encoding`/`AuthorizationShape`: the request could not be built

/// Core HTTP client.
///
/// Provides the [`Life360Client`] struct which handles:
/// - Default header and host configuration
/// - Session credential injection
/// - Response decoding and error classification
pub mod client;

/// Shared types used across the API layer.
pub mod common;

/// Request options, body encodings and request preparation.
pub mod request;

/// Response bodies and their interpretation.
pub mod response;

mod circles;
mod location;
mod safety;
mod session;

/// Re-export of the main API client.
pub use client::Life360Client;

/// Re-export of the API error type.
pub use common::ApiError;

pub use location::{LocationReport, USER_CONTEXT_HEADER};
pub use request::{Body, BodyType, PreparedRequest, QueryParams, RequestOptions};
pub use response::{ContentType, RawResponse, ResponseBody};
pub use safety::{BoundingBox, CrimeQuery, OffenderQuery};
