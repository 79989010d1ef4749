pub mod error;
pub mod observer;
pub mod params;

pub use error::EndpointError;
pub use observer::CompletionObserver;
pub use params::GenerationParams;
