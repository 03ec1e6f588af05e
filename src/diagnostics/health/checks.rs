use crate::error::ProbeError;
use crate::transport::sinks::{Sink, SinkKind};
use crate::transport::source::MessageSource;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_PANIC_GUIDE: &str =
    "https://sites.google.com/a/ft.com/ft-technology-service-transition/home/run-book-library/kafka-bridge-run-book";

/// Connectivity probe behind a single health check.
#[async_trait]
pub trait Checker: Send + Sync {
    /// Diagnostic message on success, probe failure otherwise.
    async fn check(&self) -> Result<String, ProbeError>;
}

struct SourceChecker(Arc<dyn MessageSource>);

#[async_trait]
impl Checker for SourceChecker {
    async fn check(&self) -> Result<String, ProbeError> {
        self.0.connectivity_check().await
    }
}

struct SinkChecker(Arc<dyn Sink>);

#[async_trait]
impl Checker for SinkChecker {
    async fn check(&self) -> Result<String, ProbeError> {
        self.0.connectivity_check().await
    }
}

/// Static description of a check plus the probe that evaluates it.
#[derive(Clone)]
pub struct HealthCheck {
    pub id: String,
    pub name: String,
    pub severity: u8,
    pub business_impact: String,
    pub technical_summary: String,
    pub panic_guide: String,
    checker: Arc<dyn Checker>,
}

impl HealthCheck {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        business_impact: impl Into<String>,
        technical_summary: impl Into<String>,
        panic_guide: impl Into<String>,
        checker: Arc<dyn Checker>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            severity: 1,
            business_impact: business_impact.into(),
            technical_summary: technical_summary.into(),
            panic_guide: panic_guide.into(),
            checker,
        }
    }

    /// Check that at least one source address serves the configured topic.
    pub fn source(source: Arc<dyn MessageSource>, panic_guide: &str) -> Self {
        Self::new(
            "consume-from-kafka-proxy",
            "Consume messages from kafka-proxy",
            "Consuming messages through kafka-proxy won't work. Publishing in the containerised stack won't work.",
            "Consuming messages is broken. Check if kafka-proxy in aws is reachable.",
            panic_guide,
            Arc::new(SourceChecker(source)),
        )
    }

    /// Check the destination; texts depend on which sink is configured.
    pub fn sink(sink: Arc<dyn Sink>, panic_guide: &str) -> Self {
        let checker = Arc::new(SinkChecker(Arc::clone(&sink)));
        match sink.kind() {
            SinkKind::Proxy => Self::new(
                "forward-to-kafka-proxy",
                "Forward messages to kafka-proxy.",
                "Forwarding messages to kafka-proxy in coco won't work. Publishing in the containerised stack won't work.",
                "Forwarding messages is broken. Check if kafka-proxy in coco is reachable.",
                panic_guide,
                checker,
            ),
            SinkKind::PlainHttp => Self::new(
                "forward-to-cms-notifier",
                "Forward messages to cms-notifier",
                "Forwarding messages to cms-notifier in coco won't work. Publishing in the containerised stack won't work.",
                "Forwarding messages is broken. Check networking, aws cluster reachability and/or coco cms-notifier state.",
                panic_guide,
                checker,
            ),
        }
    }

    /// Run the probe, giving up once `budget` has elapsed.
    pub async fn probe(&self, budget: Duration) -> Result<String, ProbeError> {
        tokio::time::timeout(budget, self.checker.check())
            .await
            .unwrap_or_else(|_| {
                Err(ProbeError::TimedOut {
                    check: self.name.clone(),
                    secs: budget.as_secs(),
                })
            })
    }
}

impl std::fmt::Debug for HealthCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthCheck")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}
