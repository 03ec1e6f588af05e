//! Poll → dispatch loop driving a [`Forwarder`] from a [`MessageSource`].

use crate::core::forwarder::{ForwardOutcome, Forwarder};
use crate::core::message::Message;
use crate::runtime::observability::{BridgeEvent, Observer};
use crate::transport::source::MessageSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Lifecycle of the consumer loop, published on a watch channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Idle,
    Polling,
    Dispatching,
    Stopping,
    Stopped,
}

impl ConsumerState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Polling => "polling",
            Self::Dispatching => "dispatching",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        }
    }
}

/// How a polled batch is handed to the forwarder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// One message at a time, in batch order.
    #[default]
    Sequential,
    /// Every message in the batch on its own task; the next poll waits for all of them.
    Concurrent,
}

/// Running totals since the loop started.
#[derive(Debug, Default)]
pub struct DispatchStats {
    forwarded: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchCounts {
    pub forwarded: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl DispatchStats {
    fn record(&self, outcome: ForwardOutcome) {
        let counter = match outcome {
            ForwardOutcome::Forwarded => &self.forwarded,
            ForwardOutcome::Skipped => &self.skipped,
            ForwardOutcome::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DispatchCounts {
        DispatchCounts {
            forwarded: self.forwarded.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

pub struct ConsumerLoop {
    source: Arc<dyn MessageSource>,
    forwarder: Arc<Forwarder>,
    dispatch: DispatchMode,
    observer: Arc<dyn Observer>,
    state: watch::Sender<ConsumerState>,
    stats: Arc<DispatchStats>,
}

impl ConsumerLoop {
    pub fn new(
        source: Arc<dyn MessageSource>,
        forwarder: Arc<Forwarder>,
        dispatch: DispatchMode,
        observer: Arc<dyn Observer>,
    ) -> Self {
        let (state, _) = watch::channel(ConsumerState::Idle);
        Self {
            source,
            forwarder,
            dispatch,
            observer,
            state,
            stats: Arc::new(DispatchStats::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ConsumerState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ConsumerState {
        *self.state.borrow()
    }

    pub fn stats(&self) -> DispatchCounts {
        self.stats.snapshot()
    }

    /// Poll until `shutdown` fires. A batch already being dispatched is
    /// finished before the loop exits; a pending poll is abandoned.
    pub async fn run(&self, shutdown: CancellationToken) {
        while !shutdown.is_cancelled() {
            self.transition(ConsumerState::Polling);

            let polled = tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                polled = self.source.next_batch() => polled,
            };

            match polled {
                Ok(batch) if batch.is_empty() => {}
                Ok(batch) => {
                    self.transition(ConsumerState::Dispatching);
                    self.dispatch_batch(batch).await;
                }
                Err(e) => {
                    self.observer.record_event(&BridgeEvent::PollFailed {
                        error: e.to_string(),
                    });
                }
            }
        }

        self.transition(ConsumerState::Stopping);
        self.source.shutdown().await;
        self.transition(ConsumerState::Stopped);
    }

    async fn dispatch_batch(&self, batch: Vec<Message>) {
        match self.dispatch {
            DispatchMode::Sequential => {
                for message in batch {
                    let outcome = self.forwarder.forward(message).await;
                    self.stats.record(outcome);
                }
            }
            DispatchMode::Concurrent => {
                let mut tasks = JoinSet::new();
                for message in batch {
                    let forwarder = Arc::clone(&self.forwarder);
                    let stats = Arc::clone(&self.stats);
                    tasks.spawn(async move {
                        let outcome = forwarder.forward(message).await;
                        stats.record(outcome);
                    });
                }
                while let Some(joined) = tasks.join_next().await {
                    if let Err(e) = joined {
                        tracing::error!("dispatch task aborted: {e}");
                    }
                }
            }
        }
    }

    fn transition(&self, next: ConsumerState) {
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
        if changed {
            self.observer.record_event(&BridgeEvent::ConsumerStateChanged {
                state: next.as_str(),
            });
        }
    }
}
