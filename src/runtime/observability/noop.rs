use super::traits::{BridgeEvent, Observer};

/// Discards every event.
pub struct NoopObserver;

impl Observer for NoopObserver {
    #[inline(always)]
    fn record_event(&self, _event: &BridgeEvent) {}

    fn name(&self) -> &str {
        "noop"
    }
}
