//! The HTTP transport seam.
//!
//! [`Onem2mClient`](crate::client::Onem2mClient) talks to the network only
//! through [`Transport`], so tests and embedders can swap in their own
//! implementation. [`HttpTransport`] is the reqwest-based default.

use crate::client::ClientConfig;
use crate::error::{ConsoleError, Result};
use crate::types::{HttpRequest, RawResponse};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Sends built requests and returns the raw response.
///
/// Any response that arrives, whatever its status, is `Ok`. An `Err` means no
/// response was received.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request.
    async fn send(&self, request: HttpRequest) -> Result<RawResponse>;
}

/// reqwest-based transport.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Transport with the timeout from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ConsoleError::Http(e.to_string()))?;
        Ok(HttpTransport { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse> {
        let body = request.body_bytes()?;
        let mut req_builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if !body.is_empty() {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.send().await.map_err(transport_failure)?;

        let status = response.status().as_u16();

        let mut headers = BTreeMap::new();
        for (k, v) in response.headers() {
            if let Ok(val) = v.to_str() {
                headers.insert(k.as_str().to_string(), val.to_string());
            }
        }

        let body = response.bytes().await.map_err(transport_failure)?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

fn transport_failure(err: reqwest::Error) -> ConsoleError {
    tracing::warn!(error = %err, "request failed before a response arrived");
    let message = Value::String(err.to_string()).to_string();
    ConsoleError::rejected(err.status().map(|s| s.as_u16()), None, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        assert!(HttpTransport::new(&ClientConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_rejection() {
        let config = ClientConfig {
            request_timeout_ms: 500,
            ..ClientConfig::default().with_target("127.0.0.1", 1)
        };
        let transport = HttpTransport::new(&config).unwrap();
        let request = HttpRequest {
            method: http::Method::GET,
            url: "http://127.0.0.1:1/InCSE1".to_string(),
            headers: http::HeaderMap::new(),
            body: None,
        };
        let err = transport.send(request).await.unwrap_err();
        assert!(err.is_rejection());
        assert!(err.to_string().starts_with("Error:\""));
    }
}
