//! Rendering of request primitives into HTTP requests.
//!
//! The oneM2M HTTP binding carries the request primitive in three places:
//!
//! - the target and the filter criteria in the URL
//! - metadata (originator, request id, timestamps) in `X-M2M-*` headers
//! - the resource content in the JSON body
//!
//! Query parameters come in a fixed order and a parameter with a falsy value
//! (absent, empty, zero, `false`) is left out entirely. Values are
//! percent-encoded, so only the `+` joining list elements stays literal.
//!
//! ```
//! use onem2m_console::client::RequestBuilder;
//! use onem2m_console::types::{FilterCriteria, RequestPrimitive};
//! use url::Url;
//!
//! let builder = RequestBuilder::new(Url::parse("http://localhost:8181/").unwrap());
//! let request = RequestPrimitive::retrieve("/InCSE1")
//!     .with_filter(FilterCriteria::discovery().with_labels(["x", "y"]));
//!
//! let http = builder.build(&request);
//! assert_eq!(http.url, "http://localhost:8181/InCSE1?lbl=x+y&fu=1");
//! assert_eq!(http.method, http::Method::GET);
//! ```

use crate::protocol::{content_type, join_list, names, MIME_JSON};
use crate::types::{FilterCriteria, HttpRequest, RequestPrimitive};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use url::{form_urlencoded, Url};

/// Builds [`HttpRequest`]s against a fixed base URL.
#[derive(Clone, Debug)]
pub struct RequestBuilder {
    base: String,
}

impl RequestBuilder {
    /// Builder for targets below `base`.
    pub fn new(base: Url) -> Self {
        let mut base = String::from(base);
        if !base.ends_with('/') {
            base.push('/');
        }
        RequestBuilder { base }
    }

    /// The base URL with its trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Render a request primitive. Never fails; header values that are not
    /// valid HTTP text are dropped with a warning.
    pub fn build(&self, request: &RequestPrimitive) -> HttpRequest {
        let mut url = format!("{}{}", self.base, request.to.trim_start_matches('/'));
        let query = query_pairs(request);
        if !query.is_empty() {
            let rendered: Vec<String> = query
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            url.push('?');
            url.push_str(&rendered.join("&"));
        }

        let headers = build_headers(request);

        tracing::debug!(
            method = %request.op.method(),
            url = %url,
            rqi = request.rqi.as_deref().unwrap_or(""),
            "built request"
        );

        HttpRequest {
            method: request.op.method(),
            url,
            headers,
            body: request.pc.clone(),
        }
    }
}

/// Query parameters in wire order, percent-encoded, falsy values omitted.
pub fn query_pairs(request: &RequestPrimitive) -> Vec<(String, String)> {
    let mut query = QueryPairs::default();

    query.code("rt", request.rt.as_ref().and_then(|rt| rt.rtv).map(u32::from));
    query.text("rp", request.rp.as_deref());
    query.code("rcn", request.rcn.map(u32::from));
    query.flag("da", request.da);

    if let Some(fc) = &request.fc {
        filter_pairs(&mut query, fc);
    }

    query.code("drt", request.drt.map(u32::from));
    query.0
}

fn filter_pairs(query: &mut QueryPairs, fc: &FilterCriteria) {
    query.text("crb", fc.crb.as_deref());
    query.text("cra", fc.cra.as_deref());
    query.text("ms", fc.ms.as_deref());
    query.text("us", fc.us.as_deref());
    query.number("sts", fc.sts);
    query.number("stb", fc.stb);
    query.text("exb", fc.exb.as_deref());
    query.text("exa", fc.exa.as_deref());
    query.list("lbl", &fc.lbl);
    query.code("ty", fc.ty.map(u32::from));
    query.number("sza", fc.sza);
    query.number("szb", fc.szb);
    query.list("cty", &fc.cty);
    query.number("lim", fc.lim);
    for filter in &fc.atr {
        if !filter.nm.is_empty() {
            query.value(&filter.nm, &filter.val);
        }
    }
    query.code("fu", fc.fu.map(u32::from));
}

#[derive(Default)]
struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    fn push(&mut self, key: &str, value: String) {
        self.0.push((encode(key), encode(&value)));
    }

    fn text(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.push(key, value.to_string());
        }
    }

    fn number(&mut self, key: &str, value: Option<u64>) {
        if let Some(value) = value.filter(|v| *v != 0) {
            self.push(key, value.to_string());
        }
    }

    fn code(&mut self, key: &str, value: Option<u32>) {
        self.number(key, value.map(u64::from));
    }

    fn flag(&mut self, key: &str, value: Option<bool>) {
        if value == Some(true) {
            self.push(key, "true".to_string());
        }
    }

    fn list(&mut self, key: &str, values: &[String]) {
        if !values.is_empty() {
            let encoded: Vec<String> = values.iter().map(|v| encode(v)).collect();
            self.0.push((encode(key), join_list(&encoded, "+")));
        }
    }

    fn value(&mut self, key: &str, value: &Value) {
        let rendered = match value {
            Value::Null | Value::Bool(false) => return,
            Value::Bool(true) => "true".to_string(),
            Value::Number(n) if n.as_f64() == Some(0.0) => return,
            Value::Number(n) => n.to_string(),
            Value::String(s) if s.is_empty() => return,
            Value::String(s) => s.clone(),
            Value::Array(items) if items.is_empty() => return,
            other => other.to_string(),
        };
        self.push(key, rendered);
    }
}

/// Percent-encode a query key or value. A space becomes `%20` rather than
/// `+`, which separates list elements.
fn encode(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes())
        .map(|chunk| if chunk == "+" { "%20" } else { chunk })
        .collect()
}

fn build_headers(request: &RequestPrimitive) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(MIME_JSON));
    insert(&mut headers, CONTENT_TYPE.as_str(), &content_type(request.op, request.ty));

    let optional = [
        (names::ORIGIN, request.fr.as_deref()),
        (names::REQUEST_ID, request.rqi.as_deref()),
        (names::GROUP_ID, request.gid.as_deref()),
    ];
    for (name, value) in optional {
        insert_present(&mut headers, name, value);
    }

    if let Some(rt) = request.rt.as_ref().filter(|rt| !rt.nu.is_empty()) {
        insert(&mut headers, names::RESPONSE_TARGETS, &join_list(&rt.nu, "&"));
    }

    let optional = [
        (names::ORIGINATING_TIME, request.ot.as_deref()),
        (names::RESULT_EXPIRY, request.rset.as_deref()),
        (names::REQUEST_EXPIRY, request.rqet.as_deref()),
        (names::OPERATION_EXECUTION_TIME, request.oet.as_deref()),
        (names::EVENT_CATEGORY, request.ec.as_deref()),
    ];
    for (name, value) in optional {
        insert_present(&mut headers, name, value);
    }

    headers
}

fn insert_present(headers: &mut HeaderMap, name: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        insert(headers, name, value);
    }
}

fn insert(headers: &mut HeaderMap, name: &str, value: &str) {
    match (
        HeaderName::from_bytes(name.as_bytes()),
        HeaderValue::from_str(value),
    ) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => tracing::warn!(header = name, "dropping header with invalid value"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{FilterUsage, Operation, ResourceType, ResponseType, ResultContent};
    use crate::types::ResponseTypeParam;
    use serde_json::json;

    fn builder() -> RequestBuilder {
        RequestBuilder::new(Url::parse("http://localhost:8181/").unwrap())
    }

    #[test]
    fn test_methods() {
        let b = builder();
        assert_eq!(b.build(&RequestPrimitive::retrieve("a")).method, http::Method::GET);
        assert_eq!(b.build(&RequestPrimitive::delete("a")).method, http::Method::DELETE);
        assert_eq!(b.build(&RequestPrimitive::update("a", json!({}))).method, http::Method::PUT);
        assert_eq!(
            b.build(&RequestPrimitive::create("a", ResourceType::Ae, json!({}))).method,
            http::Method::POST
        );
    }

    #[test]
    fn test_base_root_path_kept() {
        let b = RequestBuilder::new(Url::parse("http://cse:8282/api").unwrap());
        let request = b.build(&RequestPrimitive::retrieve("/InCSE1/ae1"));
        assert_eq!(request.url, "http://cse:8282/api/InCSE1/ae1");
    }

    #[test]
    fn test_empty_target_is_base() {
        let request = builder().build(&RequestPrimitive::retrieve(""));
        assert_eq!(request.url, "http://localhost:8181/");
    }

    #[test]
    fn test_labels_and_filter_usage_only() {
        let fc = FilterCriteria::discovery().with_labels(["x", "y"]);
        let request = builder().build(&RequestPrimitive::retrieve("InCSE1").with_filter(fc));
        let query = request.url.split_once('?').unwrap().1;
        assert_eq!(query, "lbl=x+y&fu=1");
    }

    #[test]
    fn test_query_values_cannot_add_keys() {
        let fc = FilterCriteria::discovery()
            .with_labels(["a&ty=2", "b c", "x+y"])
            .with_attribute("rn", "n#1=2");
        let request = builder().build(&RequestPrimitive::retrieve("InCSE1").with_filter(fc));
        let query = request.url.split_once('?').unwrap().1;
        assert_eq!(query, "lbl=a%26ty%3D2+b%20c+x%2By&rn=n%231%3D2&fu=1");

        let keys: Vec<String> = form_urlencoded::parse(query.as_bytes())
            .map(|(k, _)| k.into_owned())
            .collect();
        assert_eq!(keys, ["lbl", "rn", "fu"]);
    }

    #[test]
    fn test_query_order() {
        let mut request = RequestPrimitive::retrieve("InCSE1")
            .with_result_content(ResultContent::AttributesAndChildResources)
            .with_response_type(ResponseTypeParam {
                rtv: Some(ResponseType::BlockingRequest),
                nu: vec![],
            });
        request.drt = Some(crate::protocol::DiscoveryResultType::Structured);
        request.fc = Some(
            FilterCriteria {
                cra: Some("20240101T000000".into()),
                cty: vec!["text/plain".into(), "application/json".into()],
                fu: Some(FilterUsage::ConditionalRetrieval),
                ..Default::default()
            }
            .with_limit(5)
            .with_attribute("rn", "cnt*")
            .with_resource_type(ResourceType::Container),
        );

        let keys: Vec<String> = query_pairs(&request).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["rt", "rcn", "cra", "ty", "cty", "lim", "rn", "fu", "drt"]);
    }

    #[test]
    fn test_falsy_values_omitted() {
        let mut request = RequestPrimitive::retrieve("InCSE1");
        request.rp = Some(String::new());
        request.rcn = Some(ResultContent::Nothing);
        request.da = Some(false);
        request.fc = Some(FilterCriteria {
            sts: Some(0),
            lbl: vec![],
            ..Default::default()
        }
        .with_attribute("rn", "")
        .with_attribute("mni", 0));

        let request = builder().build(&request);
        assert!(!request.url.contains('?'));
    }

    #[test]
    fn test_content_type_on_create() {
        let request = builder().build(&RequestPrimitive::create(
            "InCSE1",
            ResourceType::Container,
            json!({ "m2m:cnt": { "rn": "c" } }),
        ));
        assert_eq!(request.header("Content-Type"), Some("application/json;ty=3"));
        assert_eq!(request.header("Accept"), Some("application/json"));
        assert_eq!(request.body, Some(json!({ "m2m:cnt": { "rn": "c" } })));
    }

    #[test]
    fn test_content_type_on_update() {
        let request = builder().build(&RequestPrimitive::update("InCSE1/c", json!({})));
        assert_eq!(request.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_metadata_headers() {
        let mut request = RequestPrimitive::new(Operation::Retrieve, "InCSE1")
            .with_origin("//localhost")
            .with_request_id("2")
            .with_response_type(ResponseTypeParam {
                rtv: None,
                nu: vec!["http://a".into(), "http://b".into()],
            });
        request.rqet = Some("20300101T000000".into());
        request.rset = Some("20300102T000000".into());
        request.ec = Some("2".into());

        let request = builder().build(&request);
        assert_eq!(request.header("X-M2M-Origin"), Some("//localhost"));
        assert_eq!(request.header("X-M2M-RI"), Some("2"));
        assert_eq!(request.header("X-M2M-RTU"), Some("http://a&http://b"));
        assert_eq!(request.header("X-M2M-RET"), Some("20300101T000000"));
        assert_eq!(request.header("X-M2M-RST"), Some("20300102T000000"));
        assert_eq!(request.header("X-M2M-EC"), Some("2"));
        assert_eq!(request.header("X-M2M-GID"), None);
        assert_eq!(request.header("X-M2M-OT"), None);
    }

    #[test]
    fn test_invalid_header_value_dropped() {
        let request = RequestPrimitive::retrieve("InCSE1").with_origin("bad\nvalue");
        let request = builder().build(&request);
        assert_eq!(request.header("X-M2M-Origin"), None);
    }
}
