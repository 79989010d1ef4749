//! Plain-HTTP transport for endpoints fronted by an HTTP(S) URL.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header;
use tracing::{debug, warn};

use crate::core::EndpointError;
use crate::transport::{EndpointTransport, EventStream, StreamEvent};

/// Header carrying the optional inference-component routing identifier.
const COMPONENT_HEADER: &str = "X-Inference-Component";

/// HTTP implementation of [`EndpointTransport`].
///
/// Posts the encoded request payload to a single invocation URL. No
/// retries: failures propagate unmodified, and the configured request
/// timeout is the only cancellation mechanism.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    bearer_token: Option<String>,
    extra_headers: Vec<(String, String)>,
}

/// Builder for [`HttpTransport`].
pub struct HttpTransportBuilder {
    url: String,
    timeout: Duration,
    user_agent: Option<String>,
    bearer_token: Option<String>,
    extra_headers: Vec<(String, String)>,
}

impl HttpTransportBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Static bearer token sent in the `Authorization` header.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Additional header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    pub fn build(self) -> Result<HttpTransport, EndpointError> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(EndpointError::Configuration(format!(
                "endpoint URL must be http(s), got `{}`",
                self.url
            )));
        }

        let default_ua = format!("inferline/{}", env!("CARGO_PKG_VERSION"));
        let ua = self.user_agent.as_deref().unwrap_or(&default_ua);

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(ua)
            .build()
            .map_err(|e| {
                EndpointError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(HttpTransport {
            client,
            url: self.url,
            bearer_token: self.bearer_token,
            extra_headers: self.extra_headers,
        })
    }
}

impl HttpTransport {
    pub fn builder(url: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder {
            url: url.into(),
            timeout: Duration::from_secs(60),
            user_agent: None,
            bearer_token: None,
            extra_headers: Vec::new(),
        }
    }

    fn request(
        &self,
        body: Bytes,
        content_type: &str,
        accept: Option<&str>,
        component: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, content_type)
            .body(body);

        if let Some(accept) = accept {
            req = req.header(header::ACCEPT, accept);
        }
        if let Some(token) = &self.bearer_token {
            req = req.bearer_auth(token);
        }
        if let Some(component) = component {
            req = req.header(COMPONENT_HEADER, component);
        }
        for (name, value) in &self.extra_headers {
            req = req.header(name.as_str(), value.as_str());
        }

        req
    }
}

/// Map a non-success response to an API error, consuming the body as the
/// message.
async fn api_error(response: reqwest::Response) -> EndpointError {
    let status = response.status();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    warn!(status = %status, "endpoint returned error status");
    EndpointError::Api {
        message,
        status_code: status.as_u16(),
    }
}

#[async_trait]
impl EndpointTransport for HttpTransport {
    fn identity(&self) -> String {
        self.url.clone()
    }

    async fn invoke(
        &self,
        body: Bytes,
        content_type: &str,
        accept: &str,
        component: Option<&str>,
    ) -> Result<Bytes, EndpointError> {
        let response = self
            .request(body, content_type, Some(accept), component)
            .send()
            .await
            .map_err(|e| EndpointError::transport("request failed", e))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        debug!(status = %response.status(), "unary invocation succeeded");
        response
            .bytes()
            .await
            .map_err(|e| EndpointError::transport("failed to read response body", e))
    }

    async fn invoke_streaming(
        &self,
        body: Bytes,
        content_type: &str,
        component: Option<&str>,
    ) -> Result<EventStream, EndpointError> {
        let response = self
            .request(body, content_type, None, component)
            .send()
            .await
            .map_err(|e| EndpointError::transport("streaming request failed", e))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        debug!(status = %response.status(), "streaming invocation opened");
        let events = response.bytes_stream().map(|chunk| match chunk {
            Ok(bytes) => Ok(StreamEvent::Payload(bytes)),
            Err(e) => Err(EndpointError::transport("stream read failed", e)),
        });

        Ok(events.boxed())
    }
}
