//
//  life360-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types
//!
//! This module holds the error type shared by the request engine, the
//! credential handling and the endpoint methods.
//!
//! # Example
//!
//! ```rust
//! use life360_client::api::common::ApiError;
//!
//! fn describe(result: Result<(), ApiError>) -> String {
//!     match result {
//!         Ok(()) => "ok".to_string(),
//!         Err(ApiError::Transport { status, .. }) => format!("HTTP {status}"),
//!         Err(ApiError::NotLoggedIn) => "please log in".to_string(),
//!         Err(e) => e.to_string(),
//!     }
//! }
//!
//! assert_eq!(describe(Err(ApiError::NotLoggedIn)), "please log in");
//! ```

use thiserror::Error;

use crate::model::CoordinateParseError;

/// Unified error type for all Life360 API operations.
///
/// # Variants
///
/// | Variant | Raised when |
/// |---------|-------------|
/// | `Transport` | The server answered with a status other than 200 |
/// | `Network` | The exchange failed below HTTP (DNS, connect, reset) |
/// | `Api` | A 200 JSON body carries an `errorMessage` |
/// | `Decoding` | A 200 body declared as JSON does not parse |
/// | `Encoding` | The request body does not fit its declared type |
/// | `AuthorizationShape` | The auth option has an unsupported shape |
/// | `InvalidRequest` | Method, header or URL cannot be represented |
/// | `Coordinates` | Coordinates could not be resolved |
/// | `NotLoggedIn` | An operation needs a session and there is none |
/// | `MissingField` | A response lacks a field the caller needs |
/// | `UnexpectedContent` | A JSON body was expected and something else came back |
///
/// # Notes
///
/// - A non-200 status always yields `Transport`, even when the body also
///   carries an `errorMessage`; the message is kept in the variant.
/// - `Network`, `Decoding` and `Coordinates` convert with `?`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a status other than 200.
    ///
    /// # Parameters
    ///
    /// - `status` - the HTTP status code
    /// - `status_text` - the canonical reason phrase
    /// - `message` - the body's `errorMessage`, when it had one
    #[error("Server responded with a {status}, {status_text}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Transport {
        status: u16,
        status_text: String,
        message: Option<String>,
    },

    /// A network-level error occurred during the request.
    ///
    /// # Parameters
    ///
    /// - `0` - The underlying `reqwest::Error`
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service reported an error inside a successful response.
    ///
    /// # Parameters
    ///
    /// - `0` - The `errorMessage` returned by the service
    #[error("API error: {0}")]
    Api(String),

    /// A body declared as JSON could not be parsed.
    #[error("Invalid JSON response: {0}")]
    Decoding(#[from] serde_json::Error),

    /// The request body cannot be encoded as its declared type.
    #[error("Unable to encode request body: {0}")]
    Encoding(String),

    /// The auth option is neither a header string nor a credential object.
    #[error("Unsupported authorization: {0}")]
    AuthorizationShape(String),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Coordinates passed to an endpoint could not be resolved.
    #[error(transparent)]
    Coordinates(#[from] CoordinateParseError),

    /// The operation needs a session.
    #[error("Not logged in")]
    NotLoggedIn,

    /// A response lacked a field the caller relies on.
    ///
    /// # Parameters
    ///
    /// - `0` - Name of the missing field
    #[error("Response is missing `{0}`")]
    MissingField(String),

    /// A JSON body was expected.
    ///
    /// # Parameters
    ///
    /// - `0` - The content type that came back instead
    #[error("Expected a JSON response, got {0}")]
    UnexpectedContent(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display_with_message() {
        let error = ApiError::Transport {
            status: 404,
            status_text: "Not Found".to_string(),
            message: Some("Circle not found".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "Server responded with a 404, Not Found: Circle not found"
        );
    }

    #[test]
    fn test_transport_display_without_message() {
        let error = ApiError::Transport {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            message: None,
        };
        assert_eq!(
            error.to_string(),
            "Server responded with a 500, Internal Server Error"
        );
    }

    #[test]
    fn test_coordinate_errors_convert() {
        let error: ApiError = CoordinateParseError::MissingLatitude.into();
        assert!(matches!(error, ApiError::Coordinates(_)));
        assert_eq!(error.to_string(), "Unable to find latitude from coordinates");
    }
}
