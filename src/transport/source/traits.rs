use crate::core::message::Message;
use crate::error::{ConsumerError, ProbeError};
use async_trait::async_trait;

/// Source queue the consumer loop pulls batches from.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Block until the next batch is available. Implementations own any
    /// backoff between failed or empty polls.
    async fn next_batch(&self) -> Result<Vec<Message>, ConsumerError>;

    /// Probe that the source is reachable and serves the configured topic.
    async fn connectivity_check(&self) -> Result<String, ProbeError>;

    /// Release server-side resources once polling has stopped.
    async fn shutdown(&self) {}
}
