//! # inferline
//!
//! Text-completion client for self-hosted model inference endpoints that
//! answer with newline-delimited JSON, with first-class streaming.
//!
//! The heart of the crate is [`reassembly`]: streamed response bodies arrive
//! as arbitrarily chunked bytes, and record boundaries rarely line up with
//! chunk boundaries. The reassembler buffers chunks and yields each complete
//! record exactly once, in order. Around it sit pluggable seams — an
//! [`EndpointTransport`] for the wire, a [`ContentCodec`] for the
//! model-specific payload format — and the [`EndpointClient`] glue that
//! turns both into `complete` and `stream` calls with stop-token trimming.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use inferline::{CompletionOptions, EndpointClient, HttpTransport, JsonOutputsCodec};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::builder("http://localhost:8080/invocations").build()?;
//!     let client = EndpointClient::builder(transport, JsonOutputsCodec).build()?;
//!
//!     let text = client
//!         .complete("Tell me a joke.", &CompletionOptions::new())
//!         .await?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod core;
pub mod reassembly;
pub mod transport;
pub mod trim;

pub use client::{CompletionOptions, EndpointClient, EndpointClientBuilder};
pub use codec::{ContentCodec, JsonOutputsCodec};
pub use core::{CompletionObserver, EndpointError, GenerationParams};
pub use reassembly::{LineBuffer, reassemble};
pub use transport::{EndpointTransport, EventStream, StreamEvent, http::HttpTransport};
pub use trim::enforce_stop_tokens;
