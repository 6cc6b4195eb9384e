//! The network seam of the client.
//!
//! The façade never talks to an HTTP library directly; it hands a finished
//! `HttpRequest` to a `Transport` and gets an `HttpResponse` back. Any 4xx or
//! 5xx is a successful exchange at this level. Only failures that leave no
//! status code behind (DNS, refused connection, timeout) are `TransportError`.
//! Once a status has arrived, an unreadable body is reported as empty.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Performs exactly one HTTP exchange per call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::{Client, Method};
    use tracing::{debug, info};

    use super::Transport;
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// `Transport` backed by a `reqwest::Client`.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: Client,
    }

    impl ReqwestTransport {
        /// Create a transport; `timeout` is passed straight to reqwest.
        pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
            let mut builder = Client::builder();
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }
            let client = builder
                .build()
                .map_err(|e| TransportError::new(format!("failed to create HTTP client: {e}")))?;
            info!(?timeout, "initialized reqwest transport");
            Ok(Self { client })
        }

        /// Wrap an already configured client.
        pub fn from_client(client: Client) -> Self {
            Self { client }
        }
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Patch => Method::PATCH,
        }
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let mut builder = self.client.request(method(request.method), request.url());
            for (key, value) in &request.headers {
                builder = builder.header(key.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| TransportError::new(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
                .collect();
            // Status is known from here on; never lose it to a body error.
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(status, error = %e, "failed to read response body");
                    String::new()
                }
            };

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
