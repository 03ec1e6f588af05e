use super::traits::{BridgeEvent, Observer};
use tracing::{debug, error, info, warn};

/// Observer that writes every event through `tracing`.
pub struct LogObserver {
    service_name: String,
}

impl LogObserver {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }
}

impl Observer for LogObserver {
    fn record_event(&self, event: &BridgeEvent) {
        let service = self.service_name.as_str();
        match event {
            BridgeEvent::MessageForwarded { transaction_id } => {
                info!(
                    service_name = %service,
                    transaction_id = %transaction_id,
                    event = "forwarding",
                    "Message has been forwarded"
                );
            }
            BridgeEvent::MessageSkipped {
                transaction_id,
                region,
            } => {
                info!(
                    service_name = %service,
                    transaction_id = %transaction_id,
                    region = %region,
                    event = "skipped",
                    "Message originates from this region, skipping"
                );
            }
            BridgeEvent::TransactionIdGenerated {
                transaction_id,
                reason,
            } => {
                info!(
                    service_name = %service,
                    transaction_id = %transaction_id,
                    reason = %reason,
                    "Couldn't extract transaction id, generated a new one"
                );
            }
            BridgeEvent::TransactionIdNonConforming { transaction_id } => {
                debug!(
                    service_name = %service,
                    transaction_id = %transaction_id,
                    "Transaction id is not in the expected format, forwarding it unchanged"
                );
            }
            BridgeEvent::OriginSystemMissing { transaction_id } => {
                info!(
                    service_name = %service,
                    transaction_id = %transaction_id,
                    "Origin system id is not set, going on"
                );
            }
            BridgeEvent::ForwardFailed {
                transaction_id,
                error,
            } => {
                error!(
                    service_name = %service,
                    transaction_id = %transaction_id,
                    error = %error,
                    "Error happened during message forwarding"
                );
            }
            BridgeEvent::PollFailed { error } => {
                warn!(service_name = %service, error = %error, "Could not read messages");
            }
            BridgeEvent::HealthCheckFailed { check, error } => {
                warn!(service_name = %service, check = %check, error = %error, "health check failed");
            }
            BridgeEvent::ConsumerStateChanged { state } => {
                debug!(service_name = %service, state = %state, "consumer.state");
            }
        }
    }

    fn name(&self) -> &str {
        "log"
    }
}
