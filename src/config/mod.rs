//
//  life360-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Client-wide defaults applied to every request: the API host and scheme,
//! the default headers, the charset assumed for responses and the debug
//! flag. Settings can be built in code or loaded from a TOML file in the
//! platform configuration directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/life360/config.toml`
//! - **macOS**: `~/Library/Application Support/life360/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\life360\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! hostname = "api-cloudfront.life360.com"
//! location_hostname = "android.life360.com"
//! scheme = "https"
//! encoding = "utf-8"
//! debug = false
//!
//! [headers]
//! Accept = "application/json"
//! X-Application = "life360-web-client"
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use life360_client::config::ClientConfig;
//!
//! // Load from the default location, falling back to defaults
//! let config = ClientConfig::load()?.with_debug(true);
//! println!("Calling {}", config.hostname);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Host of the Life360 API.
pub const DEFAULT_HOSTNAME: &str = "api-cloudfront.life360.com";

/// Host that accepts location reports from devices.
pub const DEFAULT_LOCATION_HOSTNAME: &str = "android.life360.com";

/// Scheme used to reach the API.
pub const DEFAULT_SCHEME: &str = "https";

/// Value of the `X-Application` header the web client sends.
pub const APPLICATION_ID: &str = "life360-web-client";

/// Browser user agent sent by default.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/78.0.3904.108 Safari/537.36";

/// Settings shared by every request a client makes.
///
/// # Fields
///
/// * `hostname` - API host, without scheme
/// * `location_hostname` - host receiving [`put_location`](crate::api::Life360Client::put_location) reports
/// * `scheme` - `https`, or `http` for local test servers
/// * `headers` - default headers; per-call headers replace entries with the
///   exact same name
/// * `encoding` - charset assumed for responses that name none
/// * `debug` - return bodies carrying `errorMessage` instead of failing
///
/// # Default Values
///
/// | Field | Default |
/// |-------|---------|
/// | `hostname` | `"api-cloudfront.life360.com"` |
/// | `location_hostname` | `"android.life360.com"` |
/// | `scheme` | `"https"` |
/// | `headers` | `Accept`, `X-Application`, `User-Agent` |
/// | `encoding` | `None` (UTF-8) |
/// | `debug` | `false` |
///
/// # Examples
///
/// ```rust
/// use life360_client::config::ClientConfig;
///
/// let config = ClientConfig::default();
/// assert_eq!(config.scheme, "https");
/// assert_eq!(config.headers.get("Accept").map(String::as_str), Some("application/json"));
/// assert!(!config.debug);
/// ```
///
/// # Notes
///
/// - Every field has a serde default, so a partial file is valid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Host every request goes to unless the call overrides it.
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Host location reports are sent to.
    #[serde(default = "default_location_hostname")]
    pub location_hostname: String,

    /// URL scheme.
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Default request headers.
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,

    /// Charset label assumed for responses that do not declare one.
    #[serde(default)]
    pub encoding: Option<String>,

    /// When set, a 200 response carrying `errorMessage` is returned as is.
    #[serde(default)]
    pub debug: bool,
}

fn default_hostname() -> String {
    DEFAULT_HOSTNAME.to_string()
}

fn default_location_hostname() -> String {
    DEFAULT_LOCATION_HOSTNAME.to_string()
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Accept".to_string(), "application/json".to_string()),
        ("X-Application".to_string(), APPLICATION_ID.to_string()),
        ("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string()),
    ])
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            location_hostname: default_location_hostname(),
            scheme: default_scheme(),
            headers: default_headers(),
            encoding: None,
            debug: false,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default location.
    ///
    /// # Returns
    ///
    /// - `Ok(ClientConfig)` - The loaded or default configuration
    /// - `Err` - If the file exists but cannot be read or parsed
    ///
    /// # Notes
    ///
    /// - A missing configuration file is not an error; defaults are used
    /// - The configuration path is determined by [`ClientConfig::config_path`]
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::from_path(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reads configuration from a specific TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this schema.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Parses configuration from TOML text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use life360_client::config::ClientConfig;
    ///
    /// let config = ClientConfig::from_toml_str("debug = true").unwrap();
    /// assert!(config.debug);
    /// assert_eq!(config.hostname, "api-cloudfront.life360.com");
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Returns the path to the configuration file.
    ///
    /// The file may not exist; this only returns where it would be.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "life360")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_location_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.location_hostname = hostname.into();
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Sets a default header, replacing any previous value for `name`.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            hostname = "localhost:8080"
            scheme = "http"
            "#,
        )
        .unwrap();
        assert_eq!(config.hostname, "localhost:8080");
        assert_eq!(config.scheme, "http");
        assert_eq!(config.location_hostname, DEFAULT_LOCATION_HOSTNAME);
        assert_eq!(config.headers, default_headers());
        assert!(config.encoding.is_none());
    }

    #[test]
    fn test_headers_table_replaces_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            [headers]
            Accept = "text/plain"
            "#,
        )
        .unwrap();
        assert_eq!(config.headers.len(), 1);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "debug = true\nencoding = \"latin1\"").unwrap();
        let config = ClientConfig::from_path(file.path()).unwrap();
        assert!(config.debug);
        assert_eq!(config.encoding.as_deref(), Some("latin1"));
    }

    #[test]
    fn test_from_path_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "debug = \"sometimes\"").unwrap();
        let error = ClientConfig::from_path(&path).unwrap_err();
        assert!(error.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::default()
            .with_hostname("127.0.0.1:1234")
            .with_scheme("http")
            .with_header("Accept", "text/html")
            .with_debug(true);
        assert_eq!(config.headers.get("Accept").map(String::as_str), Some("text/html"));
        assert_eq!(config.headers.len(), 3);
        assert!(config.debug);
    }
}
