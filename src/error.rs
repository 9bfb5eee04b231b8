//! Error types for the oneM2M console.
//!
//! The [`Result`] alias is used by every fallible operation in the crate.
//!
//! # Error Categories
//!
//! | Category | Variants | Raised by |
//! |----------|----------|-----------|
//! | Request | `Rejected`, `Http` | [`Onem2mClient`](crate::client::Onem2mClient) |
//! | Encoding | `HeaderParse`, `Json`, `Url` | response parsing, form serialization |
//! | Setup | `Config`, `Dictionary` | configuration, dictionary construction |
//! | Editing | `UnsupportedTemplate`, `Form` | [`RequestForm`](crate::edit::RequestForm) |
//!
//! Cache inconsistencies (orphaned children, unknown ids on update or remove)
//! are not errors. They are reported as outcomes by
//! [`ResourceTree`](crate::store::ResourceTree).
//!
//! # Rejections
//!
//! A transport failure and a non-success response status end up in the same
//! [`ConsoleError::Rejected`] variant. The message is extracted from the
//! response body's `error` field when present and renders as `Error:<message>`,
//! the string shown to the operator.
//!
//! ```
//! use onem2m_console::ConsoleError;
//!
//! let err = ConsoleError::rejected(Some(404), None, r#""resource not found""#);
//! assert_eq!(err.to_string(), r#"Error:"resource not found""#);
//! assert!(err.is_rejection());
//! ```

use crate::protocol::{Operation, ResourceType, ResponseStatusCode};
use thiserror::Error;

/// Result type for console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Errors that can occur while talking to a CSE or editing requests.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConsoleError {
    /// The request was rejected, either by the network or by the server.
    ///
    /// `status` is the HTTP status when a response arrived at all, `rsc` the
    /// oneM2M response status code when the server sent one.
    #[error("Error:{message}")]
    Rejected {
        /// HTTP status of the failed response, if any
        status: Option<u16>,
        /// oneM2M response status code, if any
        rsc: Option<ResponseStatusCode>,
        /// Best-effort message extracted from the response body
        message: String,
    },

    /// The HTTP client could not be set up.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A protocol header carried a malformed value.
    #[error("Header parse error: {0}")]
    HeaderParse(String),

    /// JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured base address is not a valid URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The short/long attribute tables are not inverses of each other.
    #[error("Attribute dictionary error: {0}")]
    Dictionary(String),

    /// No request skeleton exists for this resource type and operation.
    #[error("No template for resource type {resource_type} and operation {operation}")]
    UnsupportedTemplate {
        /// Requested resource type
        resource_type: ResourceType,
        /// Requested operation
        operation: Operation,
    },

    /// An edit addressed a part of the form that does not exist.
    #[error("Form error: {0}")]
    Form(String),
}

impl ConsoleError {
    /// Build a [`ConsoleError::Rejected`].
    pub fn rejected(
        status: Option<u16>,
        rsc: Option<ResponseStatusCode>,
        message: impl Into<String>,
    ) -> Self {
        ConsoleError::Rejected {
            status,
            rsc,
            message: message.into(),
        }
    }

    /// Check if the request was rejected by the network or the server.
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, ConsoleError::Rejected { .. })
    }

    /// Check if this is an access denied rejection.
    ///
    /// True for HTTP 401/403 and for the oneM2M `ACCESS_DENIED` and
    /// `NO_PRIVILEGE` response codes.
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        match self {
            ConsoleError::Rejected { status, rsc, .. } => {
                matches!(status, Some(401) | Some(403))
                    || matches!(
                        rsc,
                        Some(ResponseStatusCode::AccessDenied) | Some(ResponseStatusCode::NoPrivilege)
                    )
            }
            _ => false,
        }
    }
}
