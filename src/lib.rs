#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! ## Module Structure
//!
//! - **[protocol]** - Wire codes, the attribute dictionary, headers, request skeletons and descriptions
//! - **[types]** - Request and response primitives, HTTP request/response carriers
//! - **[client]** - Request building, response parsing, transport and the oneM2M client
//! - **[store]** - Payload flattening and the resource tree cache
//! - **[edit]** - Request forms, template seeding, update diffs and wire cleanup
//! - **[console]** - Client and cache wired together
//! - **[error]** - Error types and result handling
//!
//! ## Data Flow
//!
//! ```text
//! RequestForm --wire_request--> RequestPrimitive --RequestBuilder--> HttpRequest
//!                                                                       |
//!                                                                   Transport
//!                                                                       |
//! ResourceTree <--add/update/remove-- content <--ResponseParser-- RawResponse
//! ```

pub mod client;
pub mod console;
pub mod edit;
pub mod error;
pub mod protocol;
pub mod store;
pub mod types;

pub use client::{ClientConfig, Onem2mClient, RequestBuilder, ResponseParser};
pub use console::{Applied, Console};
pub use edit::{diff, seed_template, to_wire_json, RequestForm, RetrieveMode};
pub use error::{ConsoleError, Result};
pub use protocol::{AttributeDictionary, Operation, ResourceType};
pub use store::{flatten, NodeRef, ResourceTree};
pub use types::{RequestPrimitive, ResponsePrimitive};

#[cfg(test)]
mod tests;
