//! Request and response data types.

mod request;
mod response;

pub use bytes::Bytes;
pub use request::{AttributeFilter, FilterCriteria, HttpRequest, RequestPrimitive, ResponseTypeParam};
pub use response::{RawResponse, ResponsePrimitive};
