//
//  life360-client
//  model/session.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use serde::Serialize;
use serde_json::{Map, Value};

use super::{Fields, Populate, Resource};
use crate::auth::Authorization;

/// Token type assumed when the token response omits `token_type`.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// An authenticated session returned by the token endpoint.
///
/// # Example
///
/// ```rust
/// use life360_client::model::{Resource, Session};
/// use serde_json::json;
///
/// let session = Session::from_raw(&json!({"access_token": "abc123"}));
/// let auth = session.authorization().unwrap();
/// assert_eq!(auth.header_value().unwrap(), "Bearer abc123");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    /// Token scheme, usually `Bearer`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// The access token sent on every authenticated request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Remaining token response fields (`onboarding`, `user`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Session {
    /// Creates a session from a token and an optional token type.
    pub fn new(access_token: impl Into<String>, token_type: Option<String>) -> Self {
        Self {
            token_type,
            access_token: Some(access_token.into()),
            extra: Map::new(),
        }
    }

    /// Builds the `Authorization` credential for this session.
    ///
    /// Returns `None` when the session carries no access token.
    pub fn authorization(&self) -> Option<Authorization> {
        let token = self.access_token.as_deref()?;
        let token_type = self
            .token_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TOKEN_TYPE);
        Some(Authorization::Header(format!("{token_type} {token}")))
    }
}

impl Populate for Session {
    fn populate(&mut self, raw: &Map<String, Value>) {
        let mut fields = Fields::new(raw);
        fields.text("token_type", &mut self.token_type);
        fields.text("access_token", &mut self.access_token);
        fields.finish(&mut self.extra);
    }
}

impl Resource for Session {
    fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_authorization_uses_token_type() {
        let session = Session::from_raw(&json!({
            "token_type": "Token",
            "access_token": "xyz",
            "onboarding": 0
        }));
        assert_eq!(
            session.authorization(),
            Some(Authorization::Header("Token xyz".to_string()))
        );
        assert_eq!(session.extra.get("onboarding"), Some(&json!(0)));
    }

    #[test]
    fn test_authorization_requires_token() {
        assert!(Session::default().authorization().is_none());
        assert_eq!(
            Session::new("t", Some(String::new())).authorization(),
            Some(Authorization::Header("Bearer t".to_string()))
        );
    }
}
