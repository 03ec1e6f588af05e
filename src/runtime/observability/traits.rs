/// Events the bridge records while relaying messages.
///
/// Every per-message variant carries the transaction id so log lines can be
/// correlated with the publishing system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    MessageForwarded {
        transaction_id: String,
    },
    MessageSkipped {
        transaction_id: String,
        region: String,
    },
    TransactionIdGenerated {
        transaction_id: String,
        reason: String,
    },
    TransactionIdNonConforming {
        transaction_id: String,
    },
    OriginSystemMissing {
        transaction_id: String,
    },
    ForwardFailed {
        transaction_id: String,
        error: String,
    },
    PollFailed {
        error: String,
    },
    HealthCheckFailed {
        check: String,
        error: String,
    },
    ConsumerStateChanged {
        state: &'static str,
    },
}

impl BridgeEvent {
    /// Transaction id the event belongs to, if it is tied to a message.
    pub fn transaction_id(&self) -> Option<&str> {
        match self {
            Self::MessageForwarded { transaction_id }
            | Self::MessageSkipped { transaction_id, .. }
            | Self::TransactionIdGenerated { transaction_id, .. }
            | Self::TransactionIdNonConforming { transaction_id }
            | Self::OriginSystemMissing { transaction_id }
            | Self::ForwardFailed { transaction_id, .. } => Some(transaction_id),
            Self::PollFailed { .. }
            | Self::HealthCheckFailed { .. }
            | Self::ConsumerStateChanged { .. } => None,
        }
    }
}

/// Logging port. Every component receives one through its constructor.
pub trait Observer: Send + Sync {
    /// Record a discrete event
    fn record_event(&self, event: &BridgeEvent);

    /// Flush any buffered data (no-op for most backends)
    fn flush(&self) {}

    /// Human-readable name of this observer
    fn name(&self) -> &str;
}
