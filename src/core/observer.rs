use crate::core::error::EndpointError;

/// Callback hooks invoked during a completion call.
///
/// Observers see surfaced text increments and call failures; they cannot
/// alter either. An observer is always notified of an error before that
/// error is returned to the caller.
pub trait CompletionObserver: Send + Sync {
    /// Called for each non-empty increment surfaced while streaming, in
    /// emission order.
    fn on_increment(&self, _text: &str) {}

    /// Called before a transport or decode error is re-raised.
    fn on_error(&self, _error: &EndpointError) {}
}
