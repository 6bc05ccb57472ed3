//
//  life360-client
//  api/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Options and Preparation
//!
//! [`RequestOptions`] is the loose description of a call: method, headers,
//! query parameters, body and credential, each optional. [`prepare`] merges
//! it with the client configuration and the session into a
//! [`PreparedRequest`] that is ready to be sent.
//!
//! ## Body Types
//!
//! | Type | Accepted bodies | `Content-Type` |
//! |------|-----------------|----------------|
//! | `json` | structured, text | `application/json` |
//! | `form-urlencoded` (default) | object, string, text, bytes | `application/x-www-form-urlencoded` |
//! | any other token | string, text, bytes | `application/<token>`, or the token if it has a `/` |
//!
//! ## Example
//!
//! ```rust
//! use life360_client::api::request::{prepare, BodyType, RequestOptions};
//! use life360_client::config::ClientConfig;
//! use serde_json::json;
//!
//! let options = RequestOptions::new()
//!     .body(json!({"a": 1}))
//!     .body_type(BodyType::Json);
//! let request = prepare(&ClientConfig::default(), None, "/v3/x", &options).unwrap();
//!
//! assert_eq!(request.method, "POST");
//! assert_eq!(request.header("content-type"), Some("application/json"));
//! assert_eq!(request.body.as_deref(), Some(&b"{\"a\":1}"[..]));
//! ```

use serde_json::{Map, Value};
use url::{form_urlencoded, Url};

use crate::api::ApiError;
use crate::auth::Authorization;
use crate::config::ClientConfig;
use crate::model::Session;

/// Charset assumed for responses when neither the call nor the
/// configuration names one.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// A request payload before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A JSON value; objects can be form-encoded or serialized as JSON.
    Structured(Value),
    /// Text sent as its UTF-8 bytes.
    Text(String),
    /// Raw bytes sent unchanged.
    Bytes(Vec<u8>),
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// How a body is encoded on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BodyType {
    /// JSON text.
    Json,
    /// `application/x-www-form-urlencoded`.
    #[default]
    FormUrlEncoded,
    /// Any other type token, sent as the content type.
    Other(String),
}

impl BodyType {
    /// Parses a type token such as `json` or `form-urlencoded`.
    ///
    /// Unknown tokens are kept verbatim.
    pub fn parse(token: &str) -> Self {
        match token {
            "json" | "application/json" => Self::Json,
            "form-urlencoded" | "application/x-www-form-urlencoded" => Self::FormUrlEncoded,
            other => Self::Other(other.to_string()),
        }
    }

    /// The `Content-Type` header value for this type.
    pub fn content_type(&self) -> String {
        match self {
            Self::Json => "application/json".to_string(),
            Self::FormUrlEncoded => "application/x-www-form-urlencoded".to_string(),
            Self::Other(token) if token.contains('/') => token.clone(),
            Self::Other(token) => format!("application/{token}"),
        }
    }

    /// Encodes `body` for this type.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encoding`] when the body shape does not fit the
    /// type (bytes as JSON, a number as a form, an object as a raw type).
    pub fn encode(&self, body: &Body) -> Result<Vec<u8>, ApiError> {
        match (self, body) {
            (Self::Json, Body::Structured(value)) => {
                serde_json::to_vec(value).map_err(|e| ApiError::Encoding(e.to_string()))
            }
            (Self::Json, Body::Text(text)) => {
                serde_json::to_vec(text).map_err(|e| ApiError::Encoding(e.to_string()))
            }
            (Self::Json, Body::Bytes(_)) => Err(ApiError::Encoding(
                "raw bytes cannot be sent as JSON".to_string(),
            )),

            (Self::FormUrlEncoded, Body::Structured(Value::Object(map))) => {
                Ok(encode_pairs(&form_pairs(map)).into_bytes())
            }
            (Self::FormUrlEncoded, Body::Structured(other)) if !other.is_string() => Err(
                ApiError::Encoding("a url encoded body must be an object".to_string()),
            ),

            (Self::Other(_), Body::Structured(other)) if !other.is_string() => Err(
                ApiError::Encoding("body must be turned into a string".to_string()),
            ),

            (_, Body::Structured(Value::String(text))) | (_, Body::Text(text)) => {
                Ok(text.as_bytes().to_vec())
            }
            (_, Body::Bytes(bytes)) => Ok(bytes.clone()),
            (_, Body::Structured(_)) => Err(ApiError::Encoding(
                "unsupported body shape".to_string(),
            )),
        }
    }
}

/// Query parameters appended after `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParams {
    /// Key/value pairs, form-encoded in order.
    Pairs(Vec<(String, String)>),
    /// A query string that is already encoded.
    Encoded(String),
}

impl QueryParams {
    /// Builds pairs from any iterator of key/value items.
    pub fn pairs<K, V, I>(items: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Pairs(
            items
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Reads parameters from a JSON object or a pre-encoded string.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] for any other shape.
    pub fn from_value(value: &Value) -> Result<Self, ApiError> {
        match value {
            Value::Object(map) => Ok(Self::Pairs(form_pairs(map))),
            Value::String(encoded) => Ok(Self::Encoded(encoded.clone())),
            other => Err(ApiError::InvalidRequest(format!(
                "params must be an object or a string, got {other}"
            ))),
        }
    }

    /// The encoded query string, without the leading `?`.
    pub fn encode(&self) -> String {
        match self {
            Self::Pairs(pairs) => encode_pairs(pairs),
            Self::Encoded(encoded) => encoded.trim_start_matches('?').to_string(),
        }
    }
}

/// Flattens a JSON object into form pairs.
///
/// Arrays repeat their key once per element; `null` and nested objects
/// become empty values.
fn form_pairs(map: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), form_scalar(item)));
                }
            }
            other => pairs.push((key.clone(), form_scalar(other))),
        }
    }
    pairs
}

fn form_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn encode_pairs(pairs: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Loose description of a single call.
///
/// Every field is optional; [`prepare`] fills the gaps from the client
/// configuration.
///
/// # Example
///
/// ```rust
/// use life360_client::api::request::{QueryParams, RequestOptions};
///
/// let options = RequestOptions::new()
///     .method("get")
///     .header("X-Trace", "1")
///     .params(QueryParams::pairs([("since", "1700000000")]));
/// assert_eq!(options.method.as_deref(), Some("get"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Host to call instead of the configured one.
    pub hostname: Option<String>,
    /// HTTP method, case-insensitive.
    pub method: Option<String>,
    /// Headers merged over the configured defaults.
    pub headers: Vec<(String, String)>,
    pub params: Option<QueryParams>,
    pub body: Option<Body>,
    /// Encoding of `body`; form-urlencoded when unset.
    pub body_type: Option<BodyType>,
    /// Credential for this call; the session's is used when unset.
    pub auth: Option<Authorization>,
    /// Charset assumed for a response that names none.
    pub encoding: Option<String>,
}

impl RequestOptions {
    /// Creates empty options: a GET with the configured defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Adds a header, replacing an earlier one with exactly the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name.into(), value.into());
        self
    }

    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = Some(body_type);
        self
    }

    pub fn auth(mut self, auth: Authorization) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Reads options from a loose JSON bag.
    ///
    /// Recognised keys: `hostname`, `method`, `headers`, `params`, `body`,
    /// `type`, `auth` (or `authorization`) and `encoding`. Unknown keys are
    /// ignored; `null` counts as absent.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidRequest`] when a key has an unusable shape
    /// - [`ApiError::AuthorizationShape`] when the credential is malformed
    ///
    /// # Example
    ///
    /// ```rust
    /// use life360_client::api::request::{BodyType, RequestOptions};
    /// use serde_json::json;
    ///
    /// let options = RequestOptions::from_value(&json!({
    ///     "method": "put",
    ///     "headers": {"X-Trace": 7},
    ///     "body": {"name": "Home"},
    ///     "type": "json",
    ///     "authorization": "Bearer abc"
    /// })).unwrap();
    /// assert_eq!(options.body_type, Some(BodyType::Json));
    /// assert_eq!(options.headers, vec![("X-Trace".to_string(), "7".to_string())]);
    /// ```
    pub fn from_value(value: &Value) -> Result<Self, ApiError> {
        let object = value.as_object().ok_or_else(|| {
            ApiError::InvalidRequest(format!("options must be an object, got {value}"))
        })?;
        let get = |key: &str| object.get(key).filter(|v| !v.is_null());
        let text = |key: &str| -> Result<Option<String>, ApiError> {
            match get(key) {
                None => Ok(None),
                Some(Value::String(text)) => Ok(Some(text.clone())),
                Some(other) => Err(ApiError::InvalidRequest(format!(
                    "`{key}` must be a string, got {other}"
                ))),
            }
        };

        let mut options = Self {
            hostname: text("hostname")?,
            method: text("method")?,
            body_type: text("type")?.map(|token| BodyType::parse(&token)),
            encoding: text("encoding")?,
            ..Self::default()
        };

        match get("headers") {
            None => {}
            Some(Value::Object(headers)) => {
                for (name, value) in headers {
                    if !value.is_null() {
                        set_header(&mut options.headers, name.clone(), form_scalar_or_text(value));
                    }
                }
            }
            Some(other) => {
                return Err(ApiError::InvalidRequest(format!(
                    "`headers` must be an object, got {other}"
                )))
            }
        }

        options.params = get("params").map(QueryParams::from_value).transpose()?;
        options.body = get("body").map(|body| match body {
            Value::String(text) => Body::Text(text.clone()),
            other => Body::Structured(other.clone()),
        });
        options.auth = get("auth")
            .or_else(|| get("authorization"))
            .map(Authorization::from_value)
            .transpose()?;

        Ok(options)
    }
}

fn form_scalar_or_text(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) => value.to_string(),
        other => form_scalar(other),
    }
}

/// Sets `name` to `value`, replacing an entry with exactly the same name.
fn set_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers.iter_mut().find(|(existing, _)| *existing == name) {
        Some(entry) => entry.1 = value,
        None => headers.push((name, value)),
    }
}

/// A fully resolved request, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    /// Upper-cased HTTP method.
    pub method: String,
    pub url: Url,
    /// Headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Encoded payload, if any.
    pub body: Option<Vec<u8>>,
    /// Charset assumed for a response that names none.
    pub encoding: String,
}

impl PreparedRequest {
    /// Looks a header up by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Resolves `options` against the configuration and session.
///
/// # Parameters
///
/// - `config`: configured host, scheme, default headers and encoding
/// - `session`: the logged-in session, used when `options.auth` is unset
/// - `path`: request path; `""` means `/` and a missing leading `/` is added
/// - `options`: the call's options
///
/// # Returns
///
/// The prepared request, or an error when the body, credential or URL cannot
/// be represented.
pub fn prepare(
    config: &ClientConfig,
    session: Option<&Session>,
    path: &str,
    options: &RequestOptions,
) -> Result<PreparedRequest, ApiError> {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    let mut headers: Vec<(String, String)> = Vec::new();
    for (name, value) in &config.headers {
        set_header(&mut headers, name.clone(), value.clone());
    }
    for (name, value) in &options.headers {
        set_header(&mut headers, name.clone(), value.clone());
    }

    let method = match &options.method {
        Some(method) => method.to_uppercase(),
        None if options.body.is_some() => "POST".to_string(),
        None => "GET".to_string(),
    };

    let body = match &options.body {
        Some(body) => {
            let body_type = options.body_type.clone().unwrap_or_default();
            let payload = body_type.encode(body)?;
            set_header(&mut headers, "Content-Type".to_string(), body_type.content_type());
            set_header(&mut headers, "Content-Length".to_string(), payload.len().to_string());
            Some(payload)
        }
        None => None,
    };

    let authorization = match &options.auth {
        Some(auth) => Some(auth.clone()),
        None => session.and_then(Session::authorization),
    };
    if let Some(auth) = authorization {
        set_header(&mut headers, "Authorization".to_string(), auth.header_value()?);
    }

    let host = options.hostname.as_deref().unwrap_or(&config.hostname);
    let mut url = format!("{}://{}{}", config.scheme, host, path);
    if let Some(query) = options.params.as_ref().map(QueryParams::encode) {
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
    }
    let url = Url::parse(&url).map_err(|e| ApiError::InvalidRequest(format!("{url}: {e}")))?;

    let encoding = options
        .encoding
        .clone()
        .or_else(|| config.encoding.clone())
        .unwrap_or_else(|| DEFAULT_ENCODING.to_string());

    Ok(PreparedRequest {
        method,
        url,
        headers,
        body,
        encoding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ClientConfig {
        ClientConfig::default()
    }

    #[test]
    fn test_path_normalisation() {
        let request = prepare(&config(), None, "", &RequestOptions::new()).unwrap();
        assert_eq!(request.url.path(), "/");
        let request = prepare(&config(), None, "v3/circles", &RequestOptions::new()).unwrap();
        assert_eq!(request.url.path(), "/v3/circles");
        assert_eq!(request.method, "GET");
    }

    #[test]
    fn test_url_uses_configured_host_and_override() {
        let request = prepare(&config(), None, "/v3/x", &RequestOptions::new()).unwrap();
        assert_eq!(request.url.as_str(), "https://api-cloudfront.life360.com/v3/x");

        let options = RequestOptions::new().hostname("example.test");
        let request = prepare(&config(), None, "/v3/x", &options).unwrap();
        assert_eq!(request.url.host_str(), Some("example.test"));
    }

    #[test]
    fn test_json_body() {
        let options = RequestOptions::new()
            .body(json!({"a": 1}))
            .body_type(BodyType::Json);
        let request = prepare(&config(), None, "/v3/x", &options).unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.header("Content-Length"), Some("7"));
        assert_eq!(request.body.unwrap(), br#"{"a":1}"#.to_vec());
    }

    #[test]
    fn test_json_text_body_is_a_json_string() {
        let encoded = BodyType::Json.encode(&Body::from("hi")).unwrap();
        assert_eq!(encoded, br#""hi""#.to_vec());
        assert!(matches!(
            BodyType::Json.encode(&Body::Bytes(vec![1])),
            Err(ApiError::Encoding(_))
        ));
    }

    #[test]
    fn test_default_body_type_is_form() {
        let options = RequestOptions::new().body(json!({
            "username": "a b",
            "countryCode": 1,
            "tags": ["x", "y"],
            "phone": ""
        }));
        let request = prepare(&config(), None, "/v3/oauth2/token", &options).unwrap();
        assert_eq!(
            request.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        let body = String::from_utf8(request.body.unwrap()).unwrap();
        assert_eq!(body, "countryCode=1&phone=&tags=x&tags=y&username=a+b");
    }

    #[test]
    fn test_form_rejects_scalars_and_passes_text() {
        assert!(matches!(
            BodyType::FormUrlEncoded.encode(&Body::from(json!(5))),
            Err(ApiError::Encoding(_))
        ));
        assert_eq!(
            BodyType::FormUrlEncoded.encode(&Body::from(json!("a=1"))).unwrap(),
            b"a=1".to_vec()
        );
        assert_eq!(
            BodyType::FormUrlEncoded.encode(&Body::Bytes(vec![0, 1])).unwrap(),
            vec![0, 1]
        );
    }

    #[test]
    fn test_other_body_type_content_type() {
        assert_eq!(BodyType::parse("xml").content_type(), "application/xml");
        assert_eq!(BodyType::parse("text/csv").content_type(), "text/csv");

        let options = RequestOptions::new()
            .body("<a/>")
            .body_type(BodyType::parse("xml"));
        let request = prepare(&config(), None, "/x", &options).unwrap();
        assert_eq!(request.header("Content-Type"), Some("application/xml"));
        assert!(matches!(
            BodyType::parse("xml").encode(&Body::from(json!({"a": 1}))),
            Err(ApiError::Encoding(_))
        ));
    }

    #[test]
    fn test_explicit_method_is_uppercased() {
        let options = RequestOptions::new().method("delete").body("x");
        let request = prepare(&config(), None, "/x", &options).unwrap();
        assert_eq!(request.method, "DELETE");
    }

    #[test]
    fn test_headers_merge_over_defaults_by_exact_key() {
        let options = RequestOptions::new()
            .header("Accept", "text/plain")
            .header("accept", "application/xml");
        let request = prepare(&config(), None, "/x", &options).unwrap();
        let accepts: Vec<_> = request
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("accept"))
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(accepts, vec!["text/plain", "application/xml"]);
        assert_eq!(request.header("X-Application"), Some("life360-web-client"));
    }

    #[test]
    fn test_auth_option_wins_over_session() {
        let session = Session::new("tok", None);
        let request = prepare(&config(), Some(&session), "/x", &RequestOptions::new()).unwrap();
        assert_eq!(request.header("Authorization"), Some("Bearer tok"));

        let options = RequestOptions::new().auth(Authorization::Header("abc".to_string()));
        let request = prepare(&config(), Some(&session), "/x", &options).unwrap();
        assert_eq!(request.header("Authorization"), Some("Basic abc"));

        let request = prepare(&config(), None, "/x", &RequestOptions::new()).unwrap();
        assert!(request.header("Authorization").is_none());
    }

    #[test]
    fn test_params() {
        let options = RequestOptions::new().params(QueryParams::pairs([
            ("boundingBox[topLeftLatitude]", "1.5"),
            ("page", "2"),
        ]));
        let request = prepare(&config(), None, "/v3/crimes", &options).unwrap();
        let pairs: Vec<(String, String)> = request
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0], ("boundingBox[topLeftLatitude]".to_string(), "1.5".to_string()));
        assert_eq!(pairs[1], ("page".to_string(), "2".to_string()));

        assert_eq!(QueryParams::Encoded("?a=1".to_string()).encode(), "a=1");
        assert!(QueryParams::from_value(&json!(3)).is_err());
    }

    #[test]
    fn test_encoding_resolution() {
        let request = prepare(&config(), None, "/x", &RequestOptions::new()).unwrap();
        assert_eq!(request.encoding, DEFAULT_ENCODING);

        let configured = config().with_encoding("iso-8859-1");
        let request = prepare(&configured, None, "/x", &RequestOptions::new()).unwrap();
        assert_eq!(request.encoding, "iso-8859-1");

        let options = RequestOptions::new().encoding("windows-1252");
        let request = prepare(&configured, None, "/x", &options).unwrap();
        assert_eq!(request.encoding, "windows-1252");
    }

    #[test]
    fn test_from_value() {
        let options = RequestOptions::from_value(&json!({
            "hostname": "h.test",
            "method": "post",
            "params": {"time": 5},
            "body": "raw",
            "auth": {"type": "bearer", "base64": "t"},
            "encoding": null
        }))
        .unwrap();
        assert_eq!(options.hostname.as_deref(), Some("h.test"));
        assert_eq!(options.body, Some(Body::Text("raw".to_string())));
        assert_eq!(
            options.params,
            Some(QueryParams::Pairs(vec![("time".to_string(), "5".to_string())]))
        );
        assert!(options.encoding.is_none());
        assert_eq!(options.auth.unwrap().header_value().unwrap(), "Bearer t");
    }

    #[test]
    fn test_from_value_rejects_bad_shapes() {
        assert!(matches!(
            RequestOptions::from_value(&json!({"auth": 12})),
            Err(ApiError::AuthorizationShape(_))
        ));
        assert!(matches!(
            RequestOptions::from_value(&json!({"headers": "Accept"})),
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(matches!(
            RequestOptions::from_value(&json!([])),
            Err(ApiError::InvalidRequest(_))
        ));
    }
}
