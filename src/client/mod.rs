//! oneM2M HTTP client.
//!
//! This module turns request primitives into HTTP requests, sends them
//! through a pluggable transport, and turns the responses back into
//! resource content.
//!
//! # Module Organization
//!
//! ```text
//! client/
//! ├── builder   - RequestPrimitive -> HttpRequest (URL, query, headers, body)
//! ├── parser    - RawResponse -> ResponsePrimitive
//! ├── transport - Transport trait and the reqwest implementation
//! ├── fetch     - Onem2mClient and per-operation post-processing
//! ├── config    - Client configuration
//! └── utils     - Request ids, payload and error helpers
//! ```
//!
//! # Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Onem2mClient`] | Sends requests and post-processes results |
//! | [`RequestBuilder`] | Renders request primitives for the HTTP binding |
//! | [`ResponseParser`] | Reads status, protocol headers and content |
//! | [`Transport`] | Seam between the client and the network |
//! | [`ClientConfig`] | Target address, originator, timeout |
//!
//! # Examples
//!
//! ## Building a Request
//!
//! ```
//! use onem2m_console::client::{ClientConfig, RequestBuilder};
//! use onem2m_console::protocol::ResourceType;
//! use onem2m_console::types::RequestPrimitive;
//! use serde_json::json;
//!
//! let builder = RequestBuilder::new(ClientConfig::default().base_url().unwrap());
//! let request = RequestPrimitive::create("InCSE1", ResourceType::Container, json!({ "m2m:cnt": { "rn": "temp" } }))
//!     .with_origin("//localhost")
//!     .with_request_id("2");
//!
//! let http = builder.build(&request);
//! assert_eq!(http.url, "http://localhost:8181/InCSE1");
//! assert_eq!(http.header("Content-Type"), Some("application/json;ty=3"));
//! assert_eq!(http.header("X-M2M-Origin"), Some("//localhost"));
//! ```
//!
//! ## Request Identifiers
//!
//! ```
//! use onem2m_console::client::RequestIds;
//!
//! let ids = RequestIds::new();
//! assert_eq!(ids.next_id(), "2");
//! assert_eq!(ids.next_id(), "3");
//! ```

mod builder;
mod config;
mod fetch;
mod parser;
mod transport;
mod utils;

pub use builder::{query_pairs, RequestBuilder};
pub use config::ClientConfig;
pub use fetch::Onem2mClient;
pub use parser::ResponseParser;
pub use transport::{HttpTransport, Transport};
pub use utils::*;
