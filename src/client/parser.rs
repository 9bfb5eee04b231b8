//! Parsing of HTTP responses into response primitives.
//!
//! Only the content (`pc`) feeds the resource tree. The remaining fields are
//! kept for diagnostics.
//!
//! ```
//! use onem2m_console::client::ResponseParser;
//! use onem2m_console::protocol::ResponseStatusCode;
//! use onem2m_console::types::RawResponse;
//!
//! let raw = RawResponse::new(201, r#"{"m2m:cnt":{"ri":"cnt1"}}"#)
//!     .with_header("X-M2M-RSC", "2001")
//!     .with_header("X-M2M-RI", "5");
//!
//! let response = ResponseParser::parse(&raw).unwrap();
//! assert_eq!(response.rsc, Some(ResponseStatusCode::Created));
//! assert_eq!(response.rqi.as_deref(), Some("5"));
//! assert_eq!(response.pc.unwrap()["m2m:cnt"]["ri"], "cnt1");
//! ```

use crate::error::Result;
use crate::protocol::{names, parse_status_code};
use crate::types::{RawResponse, ResponsePrimitive};
use serde_json::Value;

/// Reads response primitives out of raw HTTP responses.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseParser;

impl ResponseParser {
    /// Parse status, protocol headers and JSON content.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::HeaderParse`](crate::ConsoleError::HeaderParse)
    /// for a non-numeric `X-M2M-RSC` and
    /// [`ConsoleError::Json`](crate::ConsoleError::Json) for a body that is
    /// not JSON.
    pub fn parse(raw: &RawResponse) -> Result<ResponsePrimitive> {
        let rsc = raw
            .header(names::RESPONSE_STATUS)
            .map(parse_status_code)
            .transpose()?;

        Ok(ResponsePrimitive {
            status: raw.status,
            rsc,
            rqi: owned(raw.header(names::REQUEST_ID)),
            fr: owned(raw.header(names::ORIGIN)),
            ot: owned(raw.header(names::ORIGINATING_TIME)),
            rst: owned(raw.header(names::RESULT_EXPIRY)),
            ec: owned(raw.header(names::EVENT_CATEGORY)),
            pc: Self::parse_body(raw)?,
        })
    }

    /// JSON body of a response, `None` when the body is blank.
    pub fn parse_body(raw: &RawResponse) -> Result<Option<Value>> {
        if raw.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&raw.body)?))
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}
