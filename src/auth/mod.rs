//
//  life360-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Turns the loose `auth` / `authorization` request option into the value of
//! the HTTP `Authorization` header.
//!
//! ## Supported Credential Shapes
//!
//! - **Header string**: used verbatim when it contains a space
//!   (`"Bearer abc"`), otherwise treated as Basic credentials
//!   (`"dXNlcjpwYXNz"` becomes `"Basic dXNlcjpwYXNz"`).
//! - **Structured credential**: `{ "type": ..., "base64": ... }` or
//!   `{ "type": ..., "value": ... }`. The type is matched case-insensitively
//!   against `basic`, `bearer` and `digest` and defaults to Basic. A `value`
//!   is base64-encoded before use and wins over `base64` when both are given.
//!
//! ## Example
//!
//! ```rust
//! use life360_client::auth::Authorization;
//! use serde_json::json;
//!
//! let auth = Authorization::from_value(&json!({"type": "BEARER", "base64": "abc"})).unwrap();
//! assert_eq!(auth.header_value().unwrap(), "Bearer abc");
//!
//! let auth = Authorization::from_value(&json!({"value": "user:pass"})).unwrap();
//! assert_eq!(auth.header_value().unwrap(), "Basic dXNlcjpwYXNz");
//! ```

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::RngCore;
use serde_json::Value;

use crate::api::ApiError;

/// Basic credential identifying the web client on the token endpoint.
pub const CLIENT_CREDENTIAL: &str = "Basic U3dlcUFOQWdFVkVoVWt1cGVjcmVrYXN0ZXFhVGVXckFTV2E1dXN3MzpXMnZBV3JlY2hhUHJlZGFoVVJhZ1VYYWZyQW5hbWVqdQ==";

/// Number of random bytes in a generated device id.
const DEVICE_ID_BYTES: usize = 8;

/// Authorization scheme of a structured credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthScheme {
    /// HTTP Basic authentication.
    #[default]
    Basic,
    /// Bearer token authentication.
    Bearer,
    /// HTTP Digest authentication.
    Digest,
    /// Any other scheme, sent as given.
    Other(String),
}

impl AuthScheme {
    /// Parses a scheme name, ignoring case for the known schemes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use life360_client::auth::AuthScheme;
    ///
    /// assert_eq!(AuthScheme::parse("bearer"), AuthScheme::Bearer);
    /// assert_eq!(AuthScheme::parse("Negotiate"), AuthScheme::Other("Negotiate".into()));
    /// ```
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "basic" => Self::Basic,
            "bearer" => Self::Bearer,
            "digest" => Self::Digest,
            _ => Self::Other(name.to_string()),
        }
    }

    /// The scheme name as written in the header.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic => "Basic",
            Self::Bearer => "Bearer",
            Self::Digest => "Digest",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A credential for the `Authorization` header.
///
/// # Variants
///
/// - `Header`: a raw header string.
/// - `Credential`: a scheme plus either an already encoded token (`base64`)
///   or a plain value that still needs encoding (`value`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// A raw header string.
    Header(String),
    /// A structured credential.
    Credential {
        /// Scheme placed before the token.
        scheme: AuthScheme,
        /// Token that is already base64-encoded.
        base64: Option<String>,
        /// Plain token, base64-encoded on use.
        value: Option<String>,
    },
}

impl Authorization {
    /// Basic credentials for a user name and password.
    ///
    /// # Example
    ///
    /// ```rust
    /// use life360_client::auth::Authorization;
    ///
    /// let auth = Authorization::basic("user", "pass");
    /// assert_eq!(auth.header_value().unwrap(), "Basic dXNlcjpwYXNz");
    /// ```
    pub fn basic(username: &str, password: &str) -> Self {
        Self::Credential {
            scheme: AuthScheme::Basic,
            base64: None,
            value: Some(format!("{username}:{password}")),
        }
    }

    /// A bearer token, sent as is.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Credential {
            scheme: AuthScheme::Bearer,
            base64: Some(token.into()),
            value: None,
        }
    }

    /// Reads a credential from a loose JSON value.
    ///
    /// # Parameters
    ///
    /// - `value`: a string or an object with `type`, `base64` and `value`.
    ///
    /// # Returns
    ///
    /// The parsed credential, or [`ApiError::AuthorizationShape`] for any
    /// other shape (numbers, arrays, objects with non-string members).
    pub fn from_value(value: &Value) -> Result<Self, ApiError> {
        match value {
            Value::String(header) => Ok(Self::Header(header.clone())),
            Value::Object(object) => {
                let member = |key: &str| -> Result<Option<String>, ApiError> {
                    match object.get(key) {
                        None | Some(Value::Null) => Ok(None),
                        Some(Value::String(text)) => Ok(Some(text.clone())),
                        Some(other) => Err(ApiError::AuthorizationShape(format!(
                            "`{key}` must be a string, got {other}"
                        ))),
                    }
                };
                let scheme = member("type")?
                    .map(|name| AuthScheme::parse(&name))
                    .unwrap_or_default();
                Ok(Self::Credential {
                    scheme,
                    base64: member("base64")?,
                    value: member("value")?,
                })
            }
            other => Err(ApiError::AuthorizationShape(format!(
                "expected a string or a credential object, got {other}"
            ))),
        }
    }

    /// Renders the `Authorization` header value.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AuthorizationShape`] for a structured credential
    /// that carries neither `base64` nor `value`.
    pub fn header_value(&self) -> Result<String, ApiError> {
        match self {
            Self::Header(header) if header.contains(' ') => Ok(header.clone()),
            Self::Header(header) => Ok(format!("{} {header}", AuthScheme::Basic)),
            Self::Credential {
                scheme,
                base64,
                value,
            } => {
                let token = match (value, base64) {
                    (Some(value), _) => STANDARD.encode(value),
                    (None, Some(encoded)) => encoded.clone(),
                    (None, None) => {
                        return Err(ApiError::AuthorizationShape(
                            "credential needs either `base64` or `value`".to_string(),
                        ))
                    }
                };
                Ok(format!("{scheme} {token}"))
            }
        }
    }
}

/// Generates a random device id: 8 random bytes as lowercase hex.
pub fn device_id() -> String {
    let mut bytes = [0u8; DEVICE_ID_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_string_without_space_is_basic() {
        let auth = Authorization::from_value(&json!("abc")).unwrap();
        assert_eq!(auth.header_value().unwrap(), "Basic abc");
    }

    #[test]
    fn test_header_string_with_space_is_verbatim() {
        let auth = Authorization::from_value(&json!("Token abc def")).unwrap();
        assert_eq!(auth.header_value().unwrap(), "Token abc def");
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        for (name, expected) in [("BASIC", "Basic"), ("Bearer", "Bearer"), ("digest", "Digest")] {
            let auth = Authorization::from_value(&json!({"type": name, "base64": "t"})).unwrap();
            assert_eq!(auth.header_value().unwrap(), format!("{expected} t"));
        }
    }

    #[test]
    fn test_unknown_scheme_passes_through() {
        let auth = Authorization::from_value(&json!({"type": "Hawk", "base64": "t"})).unwrap();
        assert_eq!(auth.header_value().unwrap(), "Hawk t");
    }

    #[test]
    fn test_value_is_encoded_and_wins() {
        let auth =
            Authorization::from_value(&json!({"base64": "ignored", "value": "user:pass"})).unwrap();
        assert_eq!(auth.header_value().unwrap(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_bad_shapes_are_rejected() {
        assert!(matches!(
            Authorization::from_value(&json!(42)),
            Err(ApiError::AuthorizationShape(_))
        ));
        assert!(matches!(
            Authorization::from_value(&json!({"type": "basic", "value": 5})),
            Err(ApiError::AuthorizationShape(_))
        ));
        let empty = Authorization::from_value(&json!({"type": "bearer"})).unwrap();
        assert!(matches!(empty.header_value(), Err(ApiError::AuthorizationShape(_))));
    }

    #[test]
    fn test_bearer_helper() {
        assert_eq!(Authorization::bearer("tok").header_value().unwrap(), "Bearer tok");
    }

    #[test]
    fn test_device_id_is_hex() {
        let id = device_id();
        assert_eq!(id.len(), DEVICE_ID_BYTES * 2);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
