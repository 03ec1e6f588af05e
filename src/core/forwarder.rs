//! Loop-prevention filter, enrichment and delivery for a single message.

use crate::core::enrich::{Region, TransactionId, enrich, is_forwardable, is_well_formed_transaction_id};
use crate::core::message::{Message, ORIGIN_REGION};
use crate::runtime::observability::{BridgeEvent, Observer};
use crate::transport::sinks::Sink;
use std::sync::Arc;

/// What happened to a single consumed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOutcome {
    /// Dropped by loop prevention; never reached the sink.
    Skipped,
    Forwarded,
    /// The sink rejected it; the message is lost.
    Failed,
}

/// Filter → enrich → send for one message at a time.
pub struct Forwarder {
    sink: Arc<dyn Sink>,
    region: Option<Region>,
    observer: Arc<dyn Observer>,
}

impl Forwarder {
    pub fn new(sink: Arc<dyn Sink>, region: Option<Region>, observer: Arc<dyn Observer>) -> Self {
        Self {
            sink,
            region,
            observer,
        }
    }

    pub async fn forward(&self, mut message: Message) -> ForwardOutcome {
        if !is_forwardable(&message, self.region) {
            self.observer.record_event(&BridgeEvent::MessageSkipped {
                transaction_id: message.transaction_id().unwrap_or_default().to_string(),
                region: message.header(ORIGIN_REGION).unwrap_or_default().to_string(),
            });
            return ForwardOutcome::Skipped;
        }

        let tid = enrich(&mut message, self.region);
        match &tid {
            TransactionId::Generated(generated) => {
                self.observer.record_event(&BridgeEvent::TransactionIdGenerated {
                    transaction_id: generated.clone(),
                    reason: "X-Request-Id header is empty or missing".into(),
                });
            }
            TransactionId::Existing(existing) if !is_well_formed_transaction_id(existing) => {
                self.observer
                    .record_event(&BridgeEvent::TransactionIdNonConforming {
                        transaction_id: existing.clone(),
                    });
            }
            TransactionId::Existing(_) => {}
        }

        match self.sink.send(&message).await {
            Ok(()) => {
                self.observer.record_event(&BridgeEvent::MessageForwarded {
                    transaction_id: tid.as_str().to_string(),
                });
                ForwardOutcome::Forwarded
            }
            Err(e) => {
                self.observer.record_event(&BridgeEvent::ForwardFailed {
                    transaction_id: tid.as_str().to_string(),
                    error: e.to_string(),
                });
                ForwardOutcome::Failed
            }
        }
    }
}
