//! Raw HTTP responses and parsed response primitives.

use crate::protocol::ResponseStatusCode;
use bytes::Bytes;
use serde_json::Value;
use std::collections::BTreeMap;

/// An HTTP response as received by the transport.
#[derive(Clone, Debug)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers; lookups are case-insensitive
    pub headers: BTreeMap<String, String>,
    /// Raw body bytes
    pub body: Bytes,
}

impl RawResponse {
    /// Response with a status and a body, no headers.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        RawResponse {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as UTF-8 text, if valid.
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// A oneM2M response primitive read from an HTTP response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResponsePrimitive {
    /// HTTP status code
    pub status: u16,
    /// Response status code (`X-M2M-RSC`)
    pub rsc: Option<ResponseStatusCode>,
    /// Echoed request identifier (`X-M2M-RI`)
    pub rqi: Option<String>,
    /// Responding entity (`X-M2M-Origin`)
    pub fr: Option<String>,
    /// Originating timestamp (`X-M2M-OT`)
    pub ot: Option<String>,
    /// Result expiration timestamp (`X-M2M-RST`)
    pub rst: Option<String>,
    /// Event category (`X-M2M-EC`)
    pub ec: Option<String>,
    /// Content; `None` when the body was empty
    pub pc: Option<Value>,
}

impl ResponsePrimitive {
    /// Whether both the HTTP status and the response status code, if sent,
    /// report success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.rsc.map_or(true, |rsc| rsc.is_success())
    }

    /// Take the content, or `Value::Null` if there was none.
    pub fn into_content(self) -> Value {
        self.pc.unwrap_or(Value::Null)
    }
}
