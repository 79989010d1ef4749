//! Transport seam between the completion client and the wire.

pub mod http;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::core::EndpointError;

/// One event from a streaming exchange.
///
/// Payload chunk boundaries carry no meaning; record boundaries are
/// recovered by [`crate::reassembly`].
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A chunk of response body bytes.
    Payload(Bytes),
    /// A non-data protocol signal, labeled with its event type.
    Control(String),
}

/// Stream of events produced by a streaming call.
pub type EventStream = BoxStream<'static, Result<StreamEvent, EndpointError>>;

/// A single network exchange with a model inference endpoint.
///
/// Implementations own authentication and wire formatting; callers only see
/// payload bytes. Retry and timeout policy live here too — nothing above
/// this seam retries, and a timeout surfaces as a transport error.
#[async_trait]
pub trait EndpointTransport: Send + Sync {
    /// Identifier of the endpoint this transport talks to, for diagnostics.
    fn identity(&self) -> String;

    /// Unary exchange: one request payload in, one response payload out.
    ///
    /// `component` is an optional routing identifier forwarded to the
    /// endpoint when present.
    async fn invoke(
        &self,
        body: Bytes,
        content_type: &str,
        accept: &str,
        component: Option<&str>,
    ) -> Result<Bytes, EndpointError>;

    /// Streaming exchange: one request payload in, a sequence of events out.
    ///
    /// Transport failures after the stream is open propagate mid-iteration
    /// as `Err` items.
    async fn invoke_streaming(
        &self,
        body: Bytes,
        content_type: &str,
        component: Option<&str>,
    ) -> Result<EventStream, EndpointError>;
}
