//! oneM2M protocol vocabulary.
//!
//! - [`codes`]: numeric enumerations (operations, resource types, status codes)
//! - [`dictionary`]: long/short attribute name mapping
//! - [`headers`]: HTTP binding header names and value formats
//! - [`templates`]: request-body skeletons per resource type and operation
//! - [`descriptions`]: human-readable attribute descriptions

pub mod codes;
pub mod descriptions;
pub mod dictionary;
pub mod headers;
pub mod templates;

pub use codes::{
    CseType, DiscoveryResultType, FilterUsage, Operation, ResourceType, ResponseStatusCode,
    ResponseType, ResultContent,
};
pub use descriptions::describe;
pub use dictionary::AttributeDictionary;
pub use headers::{
    content_type, join_list, names, parse_status_code, strip_prefix, MIME_JSON, PREFIX,
};
pub use templates::{request_primitive, resource_skeleton, template_for};
