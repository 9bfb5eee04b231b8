//! Logical request primitives and their HTTP rendering.
//!
//! A [`RequestPrimitive`] uses the protocol's short parameter names as serde
//! keys, so an edited request form deserializes straight into it. Scalar
//! parameters are accepted as strings or numbers, because form inputs yield
//! strings while templates carry numbers.

use crate::protocol::{
    DiscoveryResultType, FilterUsage, Operation, ResourceType, ResponseType, ResultContent,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A oneM2M request primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPrimitive {
    /// Operation
    pub op: Operation,
    /// Target address, CSE-relative (`InCSE1/ae1`) or empty for the base
    #[serde(default, deserialize_with = "lenient::required_string")]
    pub to: String,
    /// Originator
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub fr: Option<String>,
    /// Request identifier
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub rqi: Option<String>,
    /// Type of the resource to create
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::code")]
    pub ty: Option<ResourceType>,
    /// Content, wrapped under the resource's `m2m:` key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pc: Option<Value>,
    /// Role identifier
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub rol: Option<String>,
    /// Originating timestamp
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub ot: Option<String>,
    /// Request expiration timestamp
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub rqet: Option<String>,
    /// Result expiration timestamp
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub rset: Option<String>,
    /// Operation execution time
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub oet: Option<String>,
    /// Response type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rt: Option<ResponseTypeParam>,
    /// Result persistence
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub rp: Option<String>,
    /// Result content
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::code")]
    pub rcn: Option<ResultContent>,
    /// Event category
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub ec: Option<String>,
    /// Delivery aggregation
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::flag")]
    pub da: Option<bool>,
    /// Group request identifier
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub gid: Option<String>,
    /// Filter criteria
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fc: Option<FilterCriteria>,
    /// Discovery result type
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::code")]
    pub drt: Option<DiscoveryResultType>,
}

impl RequestPrimitive {
    /// Request with only an operation and a target.
    pub fn new(op: Operation, to: impl Into<String>) -> Self {
        RequestPrimitive {
            op,
            to: to.into(),
            fr: None,
            rqi: None,
            ty: None,
            pc: None,
            rol: None,
            ot: None,
            rqet: None,
            rset: None,
            oet: None,
            rt: None,
            rp: None,
            rcn: None,
            ec: None,
            da: None,
            gid: None,
            fc: None,
            drt: None,
        }
    }

    /// Plain retrieve of `to`.
    #[inline]
    pub fn retrieve(to: impl Into<String>) -> Self {
        Self::new(Operation::Retrieve, to)
    }

    /// Delete of `to` and its subtree.
    #[inline]
    pub fn delete(to: impl Into<String>) -> Self {
        Self::new(Operation::Delete, to)
    }

    /// Create request for a resource of type `ty` with wrapped content `pc`.
    pub fn create(to: impl Into<String>, ty: ResourceType, pc: Value) -> Self {
        let mut request = Self::new(Operation::Create, to);
        request.ty = Some(ty);
        request.pc = Some(pc);
        request
    }

    /// Update request carrying the changed attributes in `pc`.
    pub fn update(to: impl Into<String>, pc: Value) -> Self {
        let mut request = Self::new(Operation::Update, to);
        request.pc = Some(pc);
        request
    }

    /// Set the originator.
    pub fn with_origin(mut self, fr: impl Into<String>) -> Self {
        self.fr = Some(fr.into());
        self
    }

    /// Set the request identifier.
    pub fn with_request_id(mut self, rqi: impl Into<String>) -> Self {
        self.rqi = Some(rqi.into());
        self
    }

    /// Set the result content.
    pub fn with_result_content(mut self, rcn: ResultContent) -> Self {
        self.rcn = Some(rcn);
        self
    }

    /// Set the filter criteria.
    pub fn with_filter(mut self, fc: FilterCriteria) -> Self {
        self.fc = Some(fc);
        self
    }

    /// Set the response type.
    pub fn with_response_type(mut self, rt: ResponseTypeParam) -> Self {
        self.rt = Some(rt);
        self
    }

    /// Wrapper key of the content (`m2m:cnt`), if any.
    pub fn content_key(&self) -> Option<&str> {
        self.pc
            .as_ref()
            .and_then(Value::as_object)
            .and_then(|map| map.keys().next())
            .map(String::as_str)
    }
}

/// Response type parameter (`rt`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseTypeParam {
    /// Response type value
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::code")]
    pub rtv: Option<ResponseType>,
    /// Notification URIs for non-blocking responses
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "lenient::strings")]
    pub nu: Vec<String>,
}

/// Filter criteria (`fc`) of a retrieve or discovery request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Created before
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub crb: Option<String>,
    /// Created after
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub cra: Option<String>,
    /// Modified since
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub ms: Option<String>,
    /// Unmodified since
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub us: Option<String>,
    /// State tag smaller
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::number")]
    pub sts: Option<u64>,
    /// State tag bigger
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::number")]
    pub stb: Option<u64>,
    /// Expire before
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub exb: Option<String>,
    /// Expire after
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::string")]
    pub exa: Option<String>,
    /// Labels, all of which must match
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "lenient::strings")]
    pub lbl: Vec<String>,
    /// Resource type
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::code")]
    pub ty: Option<ResourceType>,
    /// Size above
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::number")]
    pub sza: Option<u64>,
    /// Size below
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::number")]
    pub szb: Option<u64>,
    /// Content types
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "lenient::strings")]
    pub cty: Vec<String>,
    /// Named attribute filters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub atr: Vec<AttributeFilter>,
    /// Filter usage
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::code")]
    pub fu: Option<FilterUsage>,
    /// Result limit
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient::number")]
    pub lim: Option<u64>,
}

impl FilterCriteria {
    /// Filter criteria that turn a retrieve into a discovery.
    pub fn discovery() -> Self {
        FilterCriteria {
            fu: Some(FilterUsage::DiscoveryCriteria),
            ..Default::default()
        }
    }

    /// Require all of the given labels.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lbl = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict matches to one resource type.
    pub fn with_resource_type(mut self, ty: ResourceType) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Cap the number of results.
    pub fn with_limit(mut self, lim: u64) -> Self {
        self.lim = Some(lim);
        self
    }

    /// Add a named attribute filter.
    pub fn with_attribute(mut self, nm: impl Into<String>, val: impl Into<Value>) -> Self {
        self.atr.push(AttributeFilter {
            nm: nm.into(),
            val: val.into(),
        });
        self
    }
}

/// A named attribute filter. Rendered into the query as `nm=val`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeFilter {
    /// Attribute short name
    #[serde(alias = "name")]
    pub nm: String,
    /// Expected value, may contain `*` wildcards
    #[serde(default)]
    pub val: Value,
}

/// A request ready for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: http::Method,
    /// Absolute URL including the query string
    pub url: String,
    /// Request headers
    pub headers: http::HeaderMap,
    /// Content to serialize as the request body
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Header value by name, if present and valid text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Serialized body; empty when there is no content.
    pub fn body_bytes(&self) -> serde_json::Result<Bytes> {
        match &self.body {
            Some(body) => serde_json::to_vec(body).map(Bytes::from),
            None => Ok(Bytes::new()),
        }
    }
}

/// Deserializers that accept both the string and numeric spellings of a
/// parameter. Blank strings and `null` read as absent.
mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            other => Err(D::Error::custom(format!("expected a scalar, found {}", other))),
        }
    }

    pub fn required_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(string(d)?.unwrap_or_default())
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("expected an unsigned integer, found {}", n))),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => s.trim().parse().map(Some).map_err(D::Error::custom),
            other => Err(D::Error::custom(format!("expected a number, found {}", other))),
        }
    }

    pub fn code<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: From<u32>,
    {
        number(d)?
            .map(|n| u32::try_from(n).map(T::from).map_err(D::Error::custom))
            .transpose()
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(b)),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => s.parse().map(Some).map_err(D::Error::custom),
            other => Err(D::Error::custom(format!("expected a boolean, found {}", other))),
        }
    }

    pub fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        let scalar = |v: Value| match v {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        };
        match Value::deserialize(d)? {
            Value::Array(items) => Ok(items.into_iter().filter_map(scalar).collect()),
            other => Ok(scalar(other).into_iter().collect()),
        }
    }
}
