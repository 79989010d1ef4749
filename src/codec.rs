//! Encoding prompts into request payloads and decoding responses into text.

use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;

use crate::core::{EndpointError, GenerationParams};

/// Converts between text and an endpoint's payload format.
///
/// `encode` builds the request body from a prompt and the resolved
/// generation parameters; `decode` interprets one unary response payload or
/// one streamed record. Both must be deterministic. Implement this for each
/// model-specific payload shape.
pub trait ContentCodec: Send + Sync {
    /// MIME type of encoded request payloads.
    fn content_type(&self) -> &str {
        "application/json"
    }

    /// MIME type expected of unary responses.
    fn accept(&self) -> &str {
        "application/json"
    }

    fn encode(&self, prompt: &str, params: &GenerationParams) -> Result<Bytes, EndpointError>;

    fn decode(&self, payload: &[u8]) -> Result<String, EndpointError>;
}

/// Codec for endpoints that accept `{"inputs": ..., "parameters": {...}}`
/// and answer with `{"outputs": ["..."]}` — one such object per line when
/// streaming.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOutputsCodec;

#[derive(Deserialize)]
struct OutputsRecord {
    outputs: Vec<String>,
}

impl ContentCodec for JsonOutputsCodec {
    fn encode(&self, prompt: &str, params: &GenerationParams) -> Result<Bytes, EndpointError> {
        let body = if params.is_empty() {
            json!({ "inputs": prompt })
        } else {
            json!({ "inputs": prompt, "parameters": params.to_value() })
        };
        let encoded = serde_json::to_vec(&body)
            .map_err(|e| EndpointError::decode("failed to encode request payload", e))?;
        Ok(Bytes::from(encoded))
    }

    fn decode(&self, payload: &[u8]) -> Result<String, EndpointError> {
        let record: OutputsRecord = serde_json::from_slice(payload)
            .map_err(|e| EndpointError::decode("payload is not an outputs record", e))?;
        Ok(record.outputs.into_iter().next().unwrap_or_default())
    }
}
