use thiserror::Error;

/// Errors surfaced by endpoint clients and transports.
///
/// Errors pass through unmodified: nothing in this crate retries or
/// downgrades a failure. The only silently absorbed conditions are
/// protocol no-ops (non-payload stream events, unterminated trailing
/// bytes at stream end), which are not errors.
#[derive(Error, Debug)]
pub enum EndpointError {
    /// Required endpoint identity or client configuration is missing or
    /// invalid. Surfaced at construction, never retried.
    #[error("endpoint configuration error: {0}")]
    Configuration(String),

    /// Network or protocol failure during a unary or streaming call.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned {status_code}: {message}")]
    Api { message: String, status_code: u16 },

    /// The content codec could not interpret a payload or record.
    #[error("decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl EndpointError {
    /// Transport failure wrapping an underlying error.
    pub fn transport(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Decode failure wrapping an underlying error.
    pub fn decode(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Decode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
