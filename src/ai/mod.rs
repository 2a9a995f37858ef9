//! Generation backend integration
//!
//! Provides the streaming client for the local text-generation server and a
//! scripted mock for tests.

pub mod client;
pub mod mock;
pub mod stream;

pub use client::OllamaClient;
pub use mock::MockGenerateClient;
pub use stream::ReplyStream;

use async_trait::async_trait;

#[async_trait]
pub trait GenerateService: Send + Sync {
    /// Start one generation request and expose the reply as a lazy stream of
    /// text fragments.
    ///
    /// When `context` is non-empty it is prepended to `prompt` with a blank
    /// line between them. Each call is an independent request; the stream is
    /// finite and cannot be restarted. Failures surface as stream items, not
    /// panics, and the stream ends after the first error.
    async fn stream_generate(&self, prompt: &str, context: &str) -> ReplyStream;

    /// Probe the backend for reachability.
    async fn check_backend(&self) -> crate::Result<()>;
}
