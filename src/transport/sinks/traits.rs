use crate::core::message::Message;
use crate::error::{ProbeError, SinkError};
use async_trait::async_trait;

/// Destination variants a bridge can forward to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum SinkKind {
    /// Downstream Kafka REST proxy.
    #[strum(serialize = "proxy")]
    Proxy,
    /// Plain HTTP notification endpoint (`POST <address>/notify`).
    #[strum(serialize = "plainHTTP")]
    PlainHttp,
}

/// Immutable settings owned by a single sink instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkConfig {
    pub address: String,
    pub authorization: Option<String>,
    /// Host header override for endpoints fronting several logical queues.
    pub queue: Option<String>,
    pub topic: Option<String>,
}

impl SinkConfig {
    pub(crate) fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref().filter(|auth| !auth.is_empty())
    }
}

/// Forwarding destination for bridged messages.
#[async_trait]
pub trait Sink: Send + Sync {
    fn kind(&self) -> SinkKind;

    /// Deliver one message. Non-2xx responses are failures; there is no retry.
    async fn send(&self, message: &Message) -> Result<(), SinkError>;

    /// Lightweight independent probe of the destination.
    async fn connectivity_check(&self) -> Result<String, ProbeError>;
}
