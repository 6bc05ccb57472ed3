//
//  life360-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client for the Life360 API
//!
//! This module provides the core HTTP client. It holds the configuration and
//! the current session and exposes [`Life360Client::execute`], the single
//! operation every endpoint method is built on.
//!
//! ## Features
//!
//! - Loose request options merged with configured defaults
//! - Session credential injection
//! - Content-type and charset aware response decoding
//! - Uniform error outcome for status, body and transport failures

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde_json::Value;

use crate::api::request::{self, PreparedRequest, RequestOptions};
use crate::api::response::{self, RawResponse, ResponseBody};
use crate::api::ApiError;
use crate::auth;
use crate::config::ClientConfig;
use crate::model::Session;

/// The main HTTP client for the Life360 API.
///
/// The client is cheap to share by reference: [`execute`](Self::execute)
/// takes `&self`, so concurrent calls only share the configuration and read
/// the session. Logging in and out needs `&mut self`.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use life360_client::api::Life360Client;
/// use life360_client::config::ClientConfig;
///
/// // Defaults
/// let client = Life360Client::new()?;
///
/// // Custom configuration
/// let client = Life360Client::with_config(ClientConfig::default().with_debug(true))?;
/// # Ok::<(), life360_client::api::ApiError>(())
/// ```
///
/// # Making Requests
///
/// ```rust,no_run
/// use life360_client::api::{Life360Client, RequestOptions};
///
/// # async fn example() -> Result<(), life360_client::api::ApiError> {
/// let mut client = Life360Client::new()?;
/// client.login("user@example.com", "secret").await?;
///
/// let body = client.execute("/v3/circles", &RequestOptions::new()).await?;
/// println!("{:?}", body.json());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Life360Client {
    /// The underlying HTTP client
    http: Client,
    /// Defaults applied to every request
    config: ClientConfig,
    /// Session established by `login`, if any
    session: Option<Session>,
    /// Device id sent with login and location reports, fixed per client
    device_id: String,
}

impl Life360Client {
    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client could not be built.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with the given configuration.
    ///
    /// # Parameters
    ///
    /// * `config` - Host, scheme, default headers, charset and debug flag
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client could not be built.
    pub fn with_config(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            http: Client::builder().build()?,
            config,
            session: None,
            device_id: auth::device_id(),
        })
    }

    /// Sets the session used for authenticated requests.
    ///
    /// This method uses the builder pattern and returns `self` for chaining.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use life360_client::api::Life360Client;
    /// use life360_client::model::Session;
    ///
    /// let client = Life360Client::new()?.with_session(Session::new("token", None));
    /// assert!(client.is_logged_in());
    /// # Ok::<(), life360_client::api::ApiError>(())
    /// ```
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Replaces the current session.
    pub fn set_session(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Drops the current session and returns it.
    pub(crate) fn take_session(&mut self) -> Option<Session> {
        self.session.take()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The device id this client identifies itself with.
    ///
    /// Generated once when the client is built; clones share it.
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Returns `true` when a session with an access token is present.
    pub fn is_logged_in(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.access_token.is_some())
    }

    /// Resolves `options` into the request [`execute`](Self::execute) would send.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use life360_client::api::{Life360Client, RequestOptions};
    ///
    /// let client = Life360Client::new()?;
    /// let request = client.prepare("v3/users/me", &RequestOptions::new())?;
    /// assert_eq!(request.url.path(), "/v3/users/me");
    /// # Ok::<(), life360_client::api::ApiError>(())
    /// ```
    pub fn prepare(&self, path: &str, options: &RequestOptions) -> Result<PreparedRequest, ApiError> {
        request::prepare(&self.config, self.session.as_ref(), path, options)
    }

    /// Performs one request and interprets the response.
    ///
    /// # Parameters
    ///
    /// * `path` - The API path (e.g., "/v3/circles"); `""` means `/`
    /// * `options` - Method, headers, params, body and credential overrides
    ///
    /// # Returns
    ///
    /// The decoded body: parsed JSON for `application/json`, bytes and
    /// charset for anything else, or [`ResponseBody::Empty`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request cannot be built (body, credential, header or URL)
    /// - The network exchange fails
    /// - The status is not 200
    /// - A 200 JSON body does not parse or carries `errorMessage`
    ///
    /// # Notes
    ///
    /// - No retry, caching or timeout is applied
    /// - Dropping the future abandons the call
    pub async fn execute(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        let prepared = self.prepare(path, options)?;
        let method = Method::from_bytes(prepared.method.as_bytes())
            .map_err(|_| ApiError::InvalidRequest(format!("invalid method {}", prepared.method)))?;
        let headers = header_map(&prepared.headers)?;

        tracing::debug!("{} {}", method, prepared.url);

        let mut builder = self
            .http
            .request(method, prepared.url.clone())
            .headers(headers);
        if let Some(body) = prepared.body {
            builder = builder.body(body);
        }

        let mut response = builder.send().await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let mut buffer = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            buffer.extend_from_slice(&chunk);
        }

        tracing::debug!(
            "Response {} from {} ({}, {} bytes)",
            status,
            prepared.url,
            content_type.as_deref().unwrap_or("no content type"),
            buffer.len()
        );

        response::interpret(
            RawResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                content_type,
                body: buffer,
            },
            &prepared.encoding,
            self.config.debug,
        )
    }

    /// Performs a request whose response must be JSON.
    ///
    /// # Errors
    ///
    /// Everything [`execute`](Self::execute) returns, plus
    /// [`ApiError::UnexpectedContent`] when the body is not JSON.
    pub async fn execute_json(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<Value, ApiError> {
        let body = self.execute(path, options).await?;
        let kind = body.kind();
        body.into_json()
            .ok_or_else(|| ApiError::UnexpectedContent(kind.to_string()))
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::InvalidRequest(format!("invalid header name {name}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| ApiError::InvalidRequest(format!("invalid value for header {name}")))?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_map_rejects_bad_names() {
        let headers = vec![("Bad Header".to_string(), "x".to_string())];
        assert!(matches!(header_map(&headers), Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_header_map_keeps_both_spellings() {
        let headers = vec![
            ("Accept".to_string(), "a".to_string()),
            ("accept".to_string(), "b".to_string()),
        ];
        let map = header_map(&headers).unwrap();
        assert_eq!(map.get_all("accept").iter().count(), 2);
    }

    #[test]
    fn test_session_management() {
        let mut client = Life360Client::new().unwrap();
        assert!(!client.is_logged_in());
        client.set_session(Session::new("t", None));
        assert!(client.is_logged_in());
        assert!(client.take_session().is_some());
        assert!(client.session().is_none());
    }

    #[test]
    fn test_device_id_is_stable_per_client() {
        let client = Life360Client::new().unwrap();
        let first = client.device_id().to_string();
        assert_eq!(first.len(), 16);
        assert_eq!(client.device_id(), first);
        assert_eq!(client.clone().device_id(), first);
        assert_ne!(Life360Client::new().unwrap().device_id(), first);
    }

    #[test]
    fn test_prepare_uses_session() {
        let client = Life360Client::new()
            .unwrap()
            .with_session(Session::new("abc", Some("Bearer".to_string())));
        let request = client.prepare("/v3/circles", &RequestOptions::new()).unwrap();
        assert_eq!(request.header("authorization"), Some("Bearer abc"));
    }
}
