//! The oneM2M client.
//!
//! Provides [`Onem2mClient`], which sends request primitives to a CSE and
//! post-processes the results per operation:
//!
//! | Operation | Result |
//! |-----------|--------|
//! | create | attributes sent, overlaid with the attributes the server returned |
//! | retrieve | response content as received |
//! | update | response content, with `ri` set to the request target |
//! | delete | response content as received |
//!
//! A transport failure and a non-success status both yield
//! [`ConsoleError::Rejected`].
//!
//! # Examples
//!
//! ```ignore
//! use onem2m_console::client::{ClientConfig, Onem2mClient};
//!
//! #[tokio::main]
//! async fn main() -> onem2m_console::Result<()> {
//!     let client = Onem2mClient::new(ClientConfig::default())?;
//!     let cse = client.retrieve_cse("InCSE1").await?;
//!     println!("{}", cse);
//!     Ok(())
//! }
//! ```

use crate::client::utils::{combine_attrs, error_message, wrapper_key, RequestIds};
use crate::client::{ClientConfig, HttpTransport, RequestBuilder, ResponseParser, Transport};
use crate::error::{ConsoleError, Result};
use crate::protocol::{names, parse_status_code, Operation, ResultContent};
use crate::types::{FilterCriteria, RawResponse, RequestPrimitive, ResponsePrimitive};
use serde_json::Value;
use std::sync::Arc;

/// Client for a CSE's HTTP binding.
///
/// Cloning is cheap; clones share the transport and the request id counter.
#[derive(Clone)]
pub struct Onem2mClient {
    transport: Arc<dyn Transport>,
    builder: RequestBuilder,
    config: Arc<ClientConfig>,
    ids: RequestIds,
}

impl Onem2mClient {
    /// Client using the reqwest transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Client using a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is invalid.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let builder = RequestBuilder::new(config.base_url()?);
        Ok(Onem2mClient {
            transport,
            builder,
            config: Arc::new(config),
            ids: RequestIds::new(),
        })
    }

    /// A client for another host and port, sharing this client's transport
    /// and request id counter.
    pub fn retarget(&self, host: impl Into<String>, port: u16) -> Result<Self> {
        let config = (*self.config).clone().with_target(host, port);
        let builder = RequestBuilder::new(config.base_url()?);
        Ok(Onem2mClient {
            transport: Arc::clone(&self.transport),
            builder,
            config: Arc::new(config),
            ids: self.ids.clone(),
        })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The request id counter.
    pub fn request_ids(&self) -> &RequestIds {
        &self.ids
    }

    /// The request builder for the configured base URL.
    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// A request with this client's originator and a fresh request id.
    pub fn new_request(&self, op: Operation, to: impl Into<String>) -> RequestPrimitive {
        RequestPrimitive::new(op, to)
            .with_origin(self.config.origin.clone())
            .with_request_id(self.ids.next_id())
    }

    /// Retrieve the CSE base resource.
    pub async fn retrieve_cse(&self, cse_base: &str) -> Result<Value> {
        let request = self.new_request(Operation::Retrieve, cse_base);
        self.send(request).await
    }

    /// Discover every resource below the base address.
    pub async fn discovery(&self) -> Result<Value> {
        let request = self
            .new_request(Operation::Retrieve, "")
            .with_filter(FilterCriteria::discovery());
        self.send(request).await
    }

    /// Retrieve a resource together with its direct children.
    pub async fn retrieve_children(&self, id: &str) -> Result<Value> {
        let request = self
            .new_request(Operation::Retrieve, id)
            .with_result_content(ResultContent::AttributesAndChildResources);
        self.send(request).await
    }

    /// Send a request and post-process the content per operation.
    ///
    /// Returns `Value::Null` when a retrieve or delete response had no body.
    pub async fn send(&self, request: RequestPrimitive) -> Result<Value> {
        let op = request.op;
        let target = request.to.clone();
        let sent = request.pc.clone();

        let response = self.execute(&request).await?;

        let content = match op {
            Operation::Create => match sent {
                Some(sent) => combine_attrs(sent, response.pc.as_ref()),
                None => response.into_content(),
            },
            Operation::Update => {
                let mut content = response.pc.or(sent).unwrap_or(Value::Null);
                stamp_resource_id(&mut content, &target);
                content
            }
            Operation::Retrieve | Operation::Delete | Operation::Notify => response.into_content(),
        };
        Ok(content)
    }

    /// Send a request and return the parsed response primitive.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::Rejected`] if no response arrived or the response
    /// reports failure, and parse errors for a malformed successful response.
    pub async fn execute(&self, request: &RequestPrimitive) -> Result<ResponsePrimitive> {
        let http_request = self.builder.build(request);
        if self.config.enable_logging {
            tracing::info!(
                op = %request.op,
                url = %http_request.url,
                "sending request"
            );
        }

        let raw = self.transport.send(http_request).await?;
        reject_failure(&raw)?;

        let response = ResponseParser::parse(&raw)?;
        if self.config.enable_logging {
            tracing::info!(
                status = response.status,
                rsc = ?response.rsc,
                rqi = response.rqi.as_deref().unwrap_or(""),
                "received response"
            );
        }
        Ok(response)
    }
}

impl std::fmt::Debug for Onem2mClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Onem2mClient")
            .field("base", &self.builder.base())
            .field("config", &self.config)
            .finish()
    }
}

fn reject_failure(raw: &RawResponse) -> Result<()> {
    let rsc = raw
        .header(names::RESPONSE_STATUS)
        .and_then(|v| parse_status_code(v).ok());
    let http_ok = (200..300).contains(&raw.status);
    let rsc_ok = rsc.map_or(true, |rsc| rsc.is_success());
    if http_ok && rsc_ok {
        return Ok(());
    }

    let message = error_message(raw);
    tracing::warn!(status = raw.status, rsc = ?rsc, message = %message, "request rejected");
    Err(ConsoleError::rejected(Some(raw.status), rsc, message))
}

fn stamp_resource_id(content: &mut Value, target: &str) {
    let Some(key) = wrapper_key(content).map(str::to_string) else {
        return;
    };
    if let Some(attrs) = content.get_mut(&key).and_then(Value::as_object_mut) {
        attrs.insert("ri".to_string(), Value::String(target.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HttpRequest;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    struct Canned {
        response: RawResponse,
        seen: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait]
    impl Transport for Canned {
        async fn send(&self, request: HttpRequest) -> Result<RawResponse> {
            self.seen.lock().push(request);
            Ok(self.response.clone())
        }
    }

    fn client(response: RawResponse) -> (Onem2mClient, Arc<Canned>) {
        let transport = Arc::new(Canned {
            response,
            seen: Mutex::new(Vec::new()),
        });
        let client = Onem2mClient::with_transport(ClientConfig::default(), transport.clone()).unwrap();
        (client, transport)
    }

    #[tokio::test]
    async fn test_create_combines_attributes() {
        let (client, _) = client(
            RawResponse::new(201, r#"{"m2m:cnt":{"ri":"cnt3","pi":"/InCSE1/InCSE1"}}"#)
                .with_header("X-M2M-RSC", "2001"),
        );
        let request = client.new_request(Operation::Create, "InCSE1");
        let request = RequestPrimitive {
            ty: Some(crate::protocol::ResourceType::Container),
            pc: Some(json!({ "m2m:cnt": { "rn": "c" } })),
            ..request
        };
        let content = client.send(request).await.unwrap();
        assert_eq!(content["m2m:cnt"]["rn"], "c");
        assert_eq!(content["m2m:cnt"]["ri"], "cnt3");
    }

    #[tokio::test]
    async fn test_update_stamps_target_id() {
        let (client, _) = client(RawResponse::new(200, r#"{"m2m:cnt":{"mni":4}}"#));
        let request = RequestPrimitive::update("cnt3", json!({ "m2m:cnt": { "mni": 4 } }));
        let content = client.send(request).await.unwrap();
        assert_eq!(content, json!({ "m2m:cnt": { "mni": 4, "ri": "cnt3" } }));
    }

    #[tokio::test]
    async fn test_rejection_by_status_code() {
        let (client, _) = client(
            RawResponse::new(200, r#"{"error":"no privilege"}"#).with_header("X-M2M-RSC", "5105"),
        );
        let err = client.retrieve_cse("InCSE1").await.unwrap_err();
        assert_eq!(err.to_string(), r#"Error:"no privilege""#);
        assert!(err.is_access_denied());
    }

    #[test]
    fn test_not_found_without_rsc() {
        let (client, _) = client(RawResponse::new(404, r#"{"error":"gone"}"#));
        let err = tokio_test::block_on(client.retrieve_children("ae9")).unwrap_err();
        assert_eq!(err.to_string(), r#"Error:"gone""#);
    }

    #[test]
    fn test_delete_without_body() {
        let (client, _) = client(RawResponse::new(200, "").with_header("X-M2M-RSC", "2002"));
        let request = client.new_request(Operation::Delete, "ae1");
        let content = tokio_test::block_on(client.send(request)).unwrap();
        assert_eq!(content, Value::Null);
    }

    #[tokio::test]
    async fn test_requests_carry_origin_and_ids() {
        let (client, transport) = client(RawResponse::new(200, "{}"));
        client.retrieve_cse("InCSE1").await.unwrap();
        client.retrieve_children("ae1").await.unwrap();

        let seen = transport.seen.lock();
        assert_eq!(seen[0].header("X-M2M-RI"), Some("2"));
        assert_eq!(seen[1].header("X-M2M-RI"), Some("3"));
        assert_eq!(seen[0].header("X-M2M-Origin"), Some("//localhost"));
        assert_eq!(seen[1].url, "http://localhost:8181/ae1?rcn=4");
    }

    #[tokio::test]
    async fn test_discovery_targets_base() {
        let (client, transport) = client(RawResponse::new(200, r#"{"m2m:uril":[]}"#));
        client.discovery().await.unwrap();
        assert_eq!(transport.seen.lock()[0].url, "http://localhost:8181/?fu=1");
    }

    #[tokio::test]
    async fn test_retarget_shares_counter() {
        let (client, transport) = client(RawResponse::new(200, "{}"));
        let other = client.retarget("cse.remote", 9090).unwrap();
        other.retrieve_cse("InCSE2").await.unwrap();
        client.retrieve_cse("InCSE1").await.unwrap();

        let seen = transport.seen.lock();
        assert_eq!(seen[0].url, "http://cse.remote:9090/InCSE2");
        assert_eq!(seen[1].header("X-M2M-RI"), Some("3"));
    }
}
