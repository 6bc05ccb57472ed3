//
//  life360-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Life360 Client Library
//!
//! An asynchronous client for the Life360 location sharing service.
//!
//! ## Overview
//!
//! This library logs a user in, then reads their circles, members, member
//! locations and history, saved places and neighbourhood safety data. It
//! can also ask a member's device to report its location or check in, and
//! report a location for the user's own device.
//!
//! ## Features
//!
//! - **Generic request execution**: any path with loose options, JSON,
//!   form or raw bodies and flexible credentials
//! - **Tolerant models**: string or number fields are coerced, unknown
//!   fields are kept
//! - **Flexible coordinates**: pairs, objects and strings are all accepted
//!   as a point
//! - **Configurable**: host, default headers and charset from a TOML file
//!
//! ## Module Structure
//!
//! - [`api`]: HTTP client and endpoint methods
//! - [`auth`]: Authorization shapes and device identifiers
//! - [`config`]: Client configuration
//! - [`model`]: Circles, members, locations, places and safety data
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use life360_client::{ClientConfig, Life360Client};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::load()?;
//! let mut client = Life360Client::with_config(config)?;
//! client.login("user@example.com", "secret").await?;
//!
//! let circles = client.list_circles().await?;
//! for circle in &circles {
//!     let circle = client.circle(circle.id.as_ref().unwrap()).await?;
//!     for member in &circle.members {
//!         println!("{:?}: {:?}", member.full_name(), member.location);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// HTTP client for the Life360 API.
pub mod api;

/// Authorization values and device identifiers.
pub mod auth;

/// Configuration file management.
pub mod config;

/// Resource models returned by the API.
pub mod model;

/// Re-export of the main API client.
pub use api::Life360Client;

/// Re-export of the API error type.
pub use api::ApiError;

/// Re-export of the configuration struct.
///
/// # Example
///
/// ```rust,no_run
/// use life360_client::ClientConfig;
///
/// let config = ClientConfig::load().expect("Failed to load config");
/// println!("Host: {}", config.hostname);
/// ```
pub use config::ClientConfig;

/// Library name constant.
///
/// # Value
///
/// `"life360-client"`
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library version constant.
///
/// The current version, derived from Cargo.toml at compile time.
///
/// # Example
///
/// ```rust
/// use life360_client::VERSION;
///
/// println!("life360-client {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
