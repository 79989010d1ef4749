//! Completion client tying transport, codec, reassembly and trimming
//! together.

use std::sync::Arc;

use futures::Stream;
use serde_json::json;
use tokio_stream::StreamExt;
use tracing::debug;

use crate::codec::ContentCodec;
use crate::core::{CompletionObserver, EndpointError, GenerationParams};
use crate::reassembly::reassemble;
use crate::transport::EndpointTransport;
use crate::trim::enforce_stop_tokens;

/// Per-call options layered over the client's configuration.
#[derive(Clone, Default)]
pub struct CompletionOptions {
    /// Parameter overrides, merged over the client defaults before encoding.
    pub params: GenerationParams,
    /// Stop list override; falls back to the client default when `None`.
    pub stop: Option<Vec<String>>,
    /// Observer notified of surfaced increments and of errors before they
    /// are returned.
    pub observer: Option<Arc<dyn CompletionObserver>>,
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn CompletionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
}

/// Text-completion client for a model inference endpoint.
///
/// Pairs an [`EndpointTransport`] with a [`ContentCodec`] and exposes the
/// unary and streaming completion paths. Construction is validated once;
/// calls never mutate the client.
pub struct EndpointClient<T, C> {
    transport: T,
    codec: C,
    defaults: GenerationParams,
    default_stop: Vec<String>,
    component: Option<String>,
}

/// Builder for [`EndpointClient`].
pub struct EndpointClientBuilder<T, C> {
    transport: T,
    codec: C,
    defaults: GenerationParams,
    default_stop: Vec<String>,
    component: Option<String>,
}

impl<T, C> EndpointClientBuilder<T, C> {
    /// Default generation parameters applied to every call.
    pub fn defaults(mut self, params: GenerationParams) -> Self {
        self.defaults = params;
        self
    }

    /// Default stop list applied when a call does not override it.
    pub fn stop(mut self, stop: Vec<String>) -> Self {
        self.default_stop = stop;
        self
    }

    /// Inference-component identifier forwarded to the transport on every
    /// call.
    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn build(self) -> Result<EndpointClient<T, C>, EndpointError> {
        if let Some(component) = &self.component
            && component.is_empty()
        {
            return Err(EndpointError::Configuration(
                "inference component name must not be empty".to_string(),
            ));
        }

        Ok(EndpointClient {
            transport: self.transport,
            codec: self.codec,
            defaults: self.defaults,
            default_stop: self.default_stop,
            component: self.component,
        })
    }
}

impl<T: EndpointTransport, C: ContentCodec> EndpointClient<T, C> {
    pub fn builder(transport: T, codec: C) -> EndpointClientBuilder<T, C> {
        EndpointClientBuilder {
            transport,
            codec,
            defaults: GenerationParams::new(),
            default_stop: Vec::new(),
            component: None,
        }
    }

    /// Identifying parameters of this client, for logging and diagnostics.
    pub fn identifying_params(&self) -> serde_json::Value {
        json!({
            "endpoint": self.transport.identity(),
            "component": self.component,
            "defaults": self.defaults.to_value(),
        })
    }

    fn resolve_stop<'a>(&'a self, options: &'a CompletionOptions) -> &'a [String] {
        options.stop.as_deref().unwrap_or(&self.default_stop)
    }

    fn notify_error(&self, error: &EndpointError, options: &CompletionOptions) {
        if let Some(observer) = &options.observer {
            observer.on_error(error);
        }
    }

    /// Unary completion: one request, one decoded and trimmed response.
    #[tracing::instrument(
        name = "endpoint_complete",
        skip(self, prompt, options),
        fields(endpoint = %self.transport.identity()),
        err
    )]
    pub async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, EndpointError> {
        let params = self.defaults.merged(&options.params);
        let body = self.codec.encode(prompt, &params)?;

        let invocation = self
            .transport
            .invoke(
                body,
                self.codec.content_type(),
                self.codec.accept(),
                self.component.as_deref(),
            )
            .await;
        let payload = match invocation {
            Ok(payload) => payload,
            Err(err) => {
                self.notify_error(&err, options);
                return Err(err);
            }
        };

        let text = match self.codec.decode(&payload) {
            Ok(text) => text,
            Err(err) => {
                self.notify_error(&err, options);
                return Err(err);
            }
        };

        Ok(enforce_stop_tokens(&text, self.resolve_stop(options)).to_string())
    }

    /// Streaming completion: a lazy stream of non-empty text increments.
    ///
    /// Each record from the endpoint is decoded and trimmed; increments
    /// that are empty after trimming are suppressed, the rest surface
    /// immediately in order. A transport or decode failure ends the stream
    /// with an `Err` item after notifying the observer.
    pub async fn stream<'a>(
        &'a self,
        prompt: &str,
        options: &'a CompletionOptions,
    ) -> Result<impl Stream<Item = Result<String, EndpointError>> + Send + use<'a, T, C>, EndpointError>
    {
        let params = self.defaults.merged(&options.params);
        let body = self.codec.encode(prompt, &params)?;

        let opened = self
            .transport
            .invoke_streaming(body, self.codec.content_type(), self.component.as_deref())
            .await;
        let events = match opened {
            Ok(events) => events,
            Err(err) => {
                self.notify_error(&err, options);
                return Err(err);
            }
        };

        let stop = self.resolve_stop(options).to_vec();
        debug!(endpoint = %self.transport.identity(), "streaming completion started");

        Ok(async_stream::stream! {
            let records = reassemble(events);
            let mut records = std::pin::pin!(records);

            while let Some(record) = records.next().await {
                let record = match record {
                    Ok(record) => record,
                    Err(err) => {
                        self.notify_error(&err, options);
                        yield Err(err);
                        return;
                    }
                };

                let text = match self.codec.decode(&record) {
                    Ok(text) => text,
                    Err(err) => {
                        self.notify_error(&err, options);
                        yield Err(err);
                        return;
                    }
                };

                let text = enforce_stop_tokens(&text, &stop);
                if text.is_empty() {
                    debug!("suppressing empty increment");
                    continue;
                }

                if let Some(observer) = &options.observer {
                    observer.on_increment(text);
                }
                yield Ok(text.to_string());
            }
        })
    }

    /// Streaming completion accumulated into the final text.
    ///
    /// Concatenates surfaced increments in emission order.
    #[tracing::instrument(
        name = "endpoint_complete_streamed",
        skip(self, prompt, options),
        fields(endpoint = %self.transport.identity()),
        err
    )]
    pub async fn complete_streamed(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, EndpointError> {
        let stream = self.stream(prompt, options).await?;
        let mut stream = std::pin::pin!(stream);

        let mut completion = String::new();
        while let Some(increment) = stream.next().await {
            completion.push_str(&increment?);
        }

        Ok(completion)
    }
}
