//! Header names and header value formatting for the oneM2M HTTP binding.
//!
//! # Header Formats
//!
//! | Header | Format | Example |
//! |--------|--------|---------|
//! | Content-Type | media type, `;ty=` on create | `application/json;ty=3` |
//! | X-M2M-RTU | notification URIs joined with `&` | `http://a&http://b` |
//! | X-M2M-RSC | decimal response status code | `2001` |
//!
//! Query parameters that carry lists (`lbl`, `cty`) are joined with `+`.
//!
//! # Examples
//!
//! ```
//! use onem2m_console::protocol::{content_type, join_list, parse_status_code, ResponseStatusCode};
//! use onem2m_console::protocol::{Operation, ResourceType};
//!
//! assert_eq!(content_type(Operation::Create, Some(ResourceType::Container)), "application/json;ty=3");
//! assert_eq!(content_type(Operation::Update, Some(ResourceType::Container)), "application/json");
//! assert_eq!(join_list(&["a".into(), "b".into()], "+"), "a+b");
//! assert_eq!(parse_status_code("2001").unwrap(), ResponseStatusCode::Created);
//! ```

use crate::error::{ConsoleError, Result};
use crate::protocol::{Operation, ResourceType, ResponseStatusCode};

/// Namespace prefix of wrapper keys (`m2m:cb`).
pub const PREFIX: &str = "m2m:";

/// The protocol's canonical media type.
pub const MIME_JSON: &str = "application/json";

/// Header names of the oneM2M HTTP binding.
pub mod names {
    /// Originator of the request (`fr`)
    pub const ORIGIN: &str = "X-M2M-Origin";
    /// Request identifier (`rqi`)
    pub const REQUEST_ID: &str = "X-M2M-RI";
    /// Group request identifier (`gid`)
    pub const GROUP_ID: &str = "X-M2M-GID";
    /// Response target URIs (`rt.nu`)
    pub const RESPONSE_TARGETS: &str = "X-M2M-RTU";
    /// Originating timestamp (`ot`)
    pub const ORIGINATING_TIME: &str = "X-M2M-OT";
    /// Request expiration timestamp (`rqet`)
    pub const REQUEST_EXPIRY: &str = "X-M2M-RET";
    /// Result expiration timestamp (`rset`)
    pub const RESULT_EXPIRY: &str = "X-M2M-RST";
    /// Operation execution time (`oet`)
    pub const OPERATION_EXECUTION_TIME: &str = "X-M2M-OET";
    /// Event category (`ec`)
    pub const EVENT_CATEGORY: &str = "X-M2M-EC";
    /// Response status code (`rsc`)
    pub const RESPONSE_STATUS: &str = "X-M2M-RSC";
}

/// Content-Type value for a request.
///
/// Create requests carry the type of the resource being created as a `ty`
/// media type parameter; every other operation sends the bare media type.
pub fn content_type(op: Operation, ty: Option<ResourceType>) -> String {
    match (op, ty) {
        (Operation::Create, Some(ty)) => format!("{};ty={}", MIME_JSON, ty.code()),
        _ => MIME_JSON.to_string(),
    }
}

/// Join list values with a separator.
#[inline]
pub fn join_list(values: &[String], separator: &str) -> String {
    values.join(separator)
}

/// Parse the `X-M2M-RSC` header value.
///
/// # Errors
///
/// Returns an error if the value is not a decimal number.
pub fn parse_status_code(value: &str) -> Result<ResponseStatusCode> {
    value
        .trim()
        .parse::<u32>()
        .map(ResponseStatusCode::from_code)
        .map_err(|_| ConsoleError::HeaderParse(format!("Invalid response status code: {}", value)))
}

/// Strip the `m2m:` namespace prefix from a wrapper key.
#[inline]
pub fn strip_prefix(key: &str) -> &str {
    key.strip_prefix(PREFIX).unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_create() {
        assert_eq!(
            content_type(Operation::Create, Some(ResourceType::Ae)),
            "application/json;ty=2"
        );
    }

    #[test]
    fn test_content_type_create_without_type() {
        assert_eq!(content_type(Operation::Create, None), "application/json");
    }

    #[test]
    fn test_content_type_other_operations() {
        for op in [Operation::Retrieve, Operation::Update, Operation::Delete] {
            assert_eq!(content_type(op, Some(ResourceType::Container)), MIME_JSON);
        }
    }

    #[test]
    fn test_join_list() {
        assert_eq!(join_list(&[], "&"), "");
        assert_eq!(join_list(&["x".to_string()], "+"), "x");
        assert_eq!(
            join_list(&["http://a".to_string(), "http://b".to_string()], "&"),
            "http://a&http://b"
        );
    }

    #[test]
    fn test_parse_status_code() {
        assert_eq!(parse_status_code(" 4004 ").unwrap(), ResponseStatusCode::NotFound);
        assert_eq!(parse_status_code("6999").unwrap(), ResponseStatusCode::Other(6999));
    }

    #[test]
    fn test_parse_status_code_invalid() {
        assert!(parse_status_code("ok").is_err());
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix("m2m:cnt"), "cnt");
        assert_eq!(strip_prefix("cnt"), "cnt");
    }
}
