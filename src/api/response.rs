//
//  life360-client
//  api/response.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Response Interpretation
//!
//! Classifies a finished HTTP exchange into a decoded [`ResponseBody`] or an
//! [`ApiError`].
//!
//! ## Decision Order
//!
//! 1. The `Content-Type` header picks the body decoding: `application/json`
//!    is parsed, anything else is kept as bytes with its charset.
//! 2. A status other than 200 is a [`ApiError::Transport`] error, whatever
//!    the body holds. An `errorMessage` in the body is carried along.
//! 3. A 200 JSON body with an `errorMessage` is an [`ApiError::Api`] error,
//!    unless debugging is on, in which case the body is returned.
//! 4. Anything else is returned.

use encoding_rs::{Encoding, UTF_8};
use serde_json::Value;

use crate::api::ApiError;

/// The only status treated as success.
pub const STATUS_OK: u16 = 200;

/// Field the service uses to report failures inside a body.
pub const ERROR_MESSAGE_FIELD: &str = "errorMessage";

/// A parsed `Content-Type` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Lower-cased MIME type; empty when the header was missing.
    pub mime: String,
    /// Charset label from the header, or the default.
    pub charset: String,
}

impl ContentType {
    /// Parses a header value such as `application/json; charset=utf-8`.
    ///
    /// # Parameters
    ///
    /// - `header`: the raw header value, if the response had one
    /// - `default_charset`: used when the header names no charset
    ///
    /// # Example
    ///
    /// ```rust
    /// use life360_client::api::response::ContentType;
    ///
    /// let parsed = ContentType::parse(Some("Application/JSON; Charset=\"ISO-8859-1\""), "utf-8");
    /// assert!(parsed.is_json());
    /// assert_eq!(parsed.charset, "ISO-8859-1");
    ///
    /// let missing = ContentType::parse(None, "utf-8");
    /// assert_eq!(missing.mime, "");
    /// assert_eq!(missing.charset, "utf-8");
    /// ```
    pub fn parse(header: Option<&str>, default_charset: &str) -> Self {
        let mut parts = header.unwrap_or_default().split(';');
        let mime = parts.next().unwrap_or_default().trim().to_ascii_lowercase();

        let charset = parts
            .filter_map(|part| part.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
            .map(|(_, value)| value.trim().trim_matches('"').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default_charset.to_string());

        Self { mime, charset }
    }

    /// Returns `true` for `application/json`.
    pub fn is_json(&self) -> bool {
        self.mime == "application/json"
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// A body declared as JSON.
    Json(Value),
    /// Any other body, with the charset it was declared in.
    Bytes {
        /// The raw body.
        data: Vec<u8>,
        /// Charset label used by [`ResponseBody::text`].
        charset: String,
    },
    /// The response had no body.
    Empty,
}

impl ResponseBody {
    pub fn json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Decodes the body as text.
    ///
    /// Byte bodies are decoded with their charset (UTF-8 when the label is
    /// unknown, malformed sequences replaced). JSON bodies are serialized.
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Json(value) => Some(value.to_string()),
            Self::Bytes { data, charset } => {
                let encoding = Encoding::for_label(charset.as_bytes()).unwrap_or(UTF_8);
                let (text, _, _) = encoding.decode(data);
                Some(text.into_owned())
            }
            Self::Empty => None,
        }
    }

    /// The `errorMessage` of a JSON object body.
    ///
    /// A present key always counts, so `{"errorMessage": null}` yields
    /// `Some("null")`.
    pub fn error_message(&self) -> Option<String> {
        match self.json()?.get(ERROR_MESSAGE_FIELD)? {
            Value::String(message) => Some(message.clone()),
            other => Some(other.to_string()),
        }
    }

    /// A short label for logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Json(_) => "json",
            Self::Bytes { .. } => "bytes",
            Self::Empty => "empty",
        }
    }
}

/// A finished exchange before interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    /// Canonical reason phrase for `status`.
    pub status_text: String,
    /// The `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// The complete body.
    pub body: Vec<u8>,
}

/// Turns a finished exchange into a body or an error.
///
/// # Parameters
///
/// - `raw`: the status, content type and complete body
/// - `default_charset`: charset for bodies whose content type names none
/// - `debug`: return 200 bodies carrying `errorMessage` instead of failing
///
/// # Errors
///
/// - [`ApiError::Transport`] for any status other than 200
/// - [`ApiError::Decoding`] for a 200 body declared as JSON that does not parse
/// - [`ApiError::Api`] for a 200 JSON body with `errorMessage` when `debug`
///   is off
pub fn interpret(
    raw: RawResponse,
    default_charset: &str,
    debug: bool,
) -> Result<ResponseBody, ApiError> {
    let content_type = ContentType::parse(raw.content_type.as_deref(), default_charset);
    let ok = raw.status == STATUS_OK;

    let body = if raw.body.is_empty() {
        ResponseBody::Empty
    } else if content_type.is_json() {
        match serde_json::from_slice(&raw.body) {
            Ok(value) => ResponseBody::Json(value),
            Err(e) if ok => return Err(ApiError::Decoding(e)),
            Err(_) => ResponseBody::Bytes {
                data: raw.body,
                charset: content_type.charset,
            },
        }
    } else {
        ResponseBody::Bytes {
            data: raw.body,
            charset: content_type.charset,
        }
    };

    if !ok {
        return Err(ApiError::Transport {
            status: raw.status,
            status_text: raw.status_text,
            message: body.error_message(),
        });
    }

    if let Some(message) = body.error_message() {
        if !debug {
            return Err(ApiError::Api(message));
        }
        tracing::warn!("Returning body with errorMessage in debug mode: {}", message);
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(status: u16, content_type: Option<&str>, body: &[u8]) -> RawResponse {
        RawResponse {
            status,
            status_text: if status == 200 { "OK" } else { "Not Found" }.to_string(),
            content_type: content_type.map(str::to_string),
            body: body.to_vec(),
        }
    }

    #[test]
    fn test_json_with_charset_is_parsed() {
        let body = interpret(
            raw(200, Some("application/json; charset=utf-8"), br#"{"circles":[]}"#),
            "utf-8",
            false,
        )
        .unwrap();
        assert_eq!(body, ResponseBody::Json(json!({"circles": []})));
    }

    #[test]
    fn test_text_plain_is_bytes() {
        let body = interpret(raw(200, Some("text/plain"), b"hello"), "utf-8", false).unwrap();
        assert_eq!(body.bytes(), Some(&b"hello"[..]));
        assert_eq!(body.text().as_deref(), Some("hello"));
    }

    #[test]
    fn test_missing_content_type_is_bytes() {
        let body = interpret(raw(200, None, b"{}"), "utf-8", false).unwrap();
        assert_eq!(body.kind(), "bytes");
    }

    #[test]
    fn test_charset_decoding() {
        let body = interpret(
            raw(200, Some("text/plain; charset=iso-8859-1"), &[0x63, 0x61, 0x66, 0xe9]),
            "utf-8",
            false,
        )
        .unwrap();
        assert_eq!(body.text().as_deref(), Some("café"));

        let defaulted = interpret(raw(200, Some("text/plain"), &[0xe9]), "latin1", false).unwrap();
        assert_eq!(defaulted.text().as_deref(), Some("é"));
    }

    #[test]
    fn test_empty_body() {
        let body = interpret(raw(200, Some("application/json"), b""), "utf-8", false).unwrap();
        assert_eq!(body, ResponseBody::Empty);
        assert!(body.text().is_none());
    }

    #[test]
    fn test_status_wins_over_body() {
        let error = interpret(
            raw(404, Some("application/json"), br#"{"errorMessage":"Circle not found"}"#),
            "utf-8",
            false,
        )
        .unwrap_err();
        match error {
            ApiError::Transport {
                status,
                status_text,
                message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
                assert_eq!(message.as_deref(), Some("Circle not found"));
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(
            interpret(raw(404, Some("application/json"), b"<html>"), "utf-8", true),
            Err(ApiError::Transport { message: None, .. })
        ));
    }

    #[test]
    fn test_error_message_on_success() {
        let payload = br#"{"errorMessage":"Unable to find request","status":400}"#;
        assert!(matches!(
            interpret(raw(200, Some("application/json"), payload), "utf-8", false),
            Err(ApiError::Api(message)) if message == "Unable to find request"
        ));

        let body = interpret(raw(200, Some("application/json"), payload), "utf-8", true).unwrap();
        assert_eq!(body.error_message().as_deref(), Some("Unable to find request"));
    }

    #[test]
    fn test_null_error_message_still_fails() {
        assert!(matches!(
            interpret(raw(200, Some("application/json"), br#"{"errorMessage":null}"#), "utf-8", false),
            Err(ApiError::Api(message)) if message == "null"
        ));
        let body = interpret(raw(200, Some("application/json"), br#"{"status":"ok"}"#), "utf-8", false);
        assert!(body.is_ok());
    }

    #[test]
    fn test_invalid_json_on_success() {
        assert!(matches!(
            interpret(raw(200, Some("application/json"), b"{oops"), "utf-8", false),
            Err(ApiError::Decoding(_))
        ));
    }
}
