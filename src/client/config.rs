//! Configuration for the oneM2M client.
//!
//! # Configuration Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `scheme` | `http` | URL scheme of the CSE |
//! | `host` | `localhost` | CSE host name |
//! | `port` | 8181 | CSE port |
//! | `root_path` | `/` | Path prefix all targets are appended to |
//! | `origin` | `//localhost` | Originator sent in `X-M2M-Origin` |
//! | `request_timeout_ms` | 30000 | Per-request timeout |
//! | `enable_logging` | false | Log requests and responses |
//!
//! # Examples
//!
//! ```
//! use onem2m_console::client::ClientConfig;
//!
//! let config = ClientConfig::default();
//! assert_eq!(config.base_url().unwrap().as_str(), "http://localhost:8181/");
//!
//! let config = ClientConfig::from_json_str(r#"{ "host": "cse.local", "port": 8282 }"#).unwrap();
//! assert_eq!(config.base_url().unwrap().as_str(), "http://cse.local:8282/");
//! assert_eq!(config.origin, "//localhost");
//! ```

use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for the oneM2M client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// URL scheme, `http` or `https`.
    pub scheme: String,

    /// Host name or address of the CSE.
    pub host: String,

    /// Port of the CSE's HTTP binding.
    pub port: u16,

    /// Path prefix that request targets are appended to.
    ///
    /// A missing trailing slash is added by [`base_url`](Self::base_url).
    pub root_path: String,

    /// Originator identifier sent with every request.
    pub origin: String,

    /// Request timeout in milliseconds.
    ///
    /// The transport gives up on a request after this long and reports it as
    /// a rejection.
    pub request_timeout_ms: u64,

    /// Enable request logging.
    ///
    /// When enabled, logs request/response details using the `tracing` crate.
    pub enable_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: 8181,
            root_path: "/".to_string(),
            origin: "//localhost".to_string(),
            request_timeout_ms: 30000,
            enable_logging: false,
        }
    }
}

impl ClientConfig {
    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The same configuration pointed at another host and port.
    pub fn with_target(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Base URL that request targets are joined onto. Always ends with `/`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Config`] for an unsupported scheme or an empty
    /// host, and [`ConsoleError::Url`] if the parts do not form a URL.
    pub fn base_url(&self) -> Result<Url> {
        if self.scheme != "http" && self.scheme != "https" {
            return Err(ConsoleError::Config(format!(
                "unsupported scheme '{}'",
                self.scheme
            )));
        }
        if self.host.trim().is_empty() {
            return Err(ConsoleError::Config("host must not be empty".to_string()));
        }

        let mut path = self.root_path.trim().to_string();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        if !path.ends_with('/') {
            path.push('/');
        }

        Ok(Url::parse(&format!(
            "{}://{}:{}{}",
            self.scheme, self.host, self.port, path
        ))?)
    }
}
