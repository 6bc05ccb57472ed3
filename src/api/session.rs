//
//  life360-client
//  api/session.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Login, logout and the current user.

use serde_json::json;

use super::{ApiError, Life360Client, RequestOptions};
use crate::auth::{Authorization, CLIENT_CREDENTIAL};
use crate::model::{Member, Resource, Session, DEFAULT_TOKEN_TYPE};

const TOKEN_PATH: &str = "/v3/oauth2/token";
const ME_PATH: &str = "/v3/users/me";

impl Life360Client {
    /// Logs in with a user name (email) and password.
    ///
    /// The password grant is posted form-encoded with the web client's
    /// credential and this client's device id. On success the session is stored
    /// and used by every later request.
    ///
    /// # Parameters
    ///
    /// * `username` - Account email
    /// * `password` - Account password
    ///
    /// # Returns
    ///
    /// A copy of the stored session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingField`] when the token response has no
    /// `access_token`, or any error of [`execute`](Self::execute).
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Session, ApiError> {
        let options = RequestOptions::new()
            .method("POST")
            .header("X-Device-Id", self.device_id())
            .auth(Authorization::Header(CLIENT_CREDENTIAL.to_string()))
            .body(json!({
                "countryCode": 1,
                "password": password,
                "username": username,
                "phone": "",
                "grant_type": "password",
            }));

        let json = self.execute_json(TOKEN_PATH, &options).await?;
        let mut session = Session::from_raw(&json);
        if session.access_token.is_none() {
            return Err(ApiError::MissingField("access_token".to_string()));
        }
        if session.token_type.as_deref().map_or(true, str::is_empty) {
            session.token_type = Some(DEFAULT_TOKEN_TYPE.to_string());
        }

        tracing::debug!("Logged in as {}", username);
        self.set_session(session.clone());
        Ok(session)
    }

    /// Forgets the current session.
    ///
    /// Nothing is sent to the server; the token simply stops being used.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotLoggedIn`] when there is no session.
    pub fn logout(&mut self) -> Result<Session, ApiError> {
        self.take_session().ok_or(ApiError::NotLoggedIn)
    }

    /// Fetches the logged-in user.
    pub async fn me(&self) -> Result<Member, ApiError> {
        let json = self.execute_json(ME_PATH, &RequestOptions::new()).await?;
        Ok(Member::from_raw(&json))
    }
}
