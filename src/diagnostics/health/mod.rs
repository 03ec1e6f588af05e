//! Health report and good-to-go aggregation over the source and sink probes.
//!
//! Both paths run the two probes concurrently. The report waits for both and
//! always describes each check; GTG stops at the first failure and surfaces
//! its diagnostic. Each probe is bounded by [`PROBE_TIMEOUT`], which stays
//! below the admin request timeout so a hanging dependency shows up as a
//! failed check rather than a timed-out request.

mod checks;

pub use checks::{Checker, DEFAULT_PANIC_GUIDE, HealthCheck};

use crate::runtime::observability::{BridgeEvent, Observer};
use chrono::Utc;
use futures_util::future::{join, try_join};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub const HEALTH_SCHEMA_VERSION: u8 = 1;

/// Upper bound for a single connectivity probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub id: String,
    pub name: String,
    pub ok: bool,
    pub severity: u8,
    pub business_impact: String,
    pub technical_summary: String,
    pub panic_guide: String,
    pub check_output: String,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub schema_version: u8,
    pub system_code: String,
    pub name: String,
    pub description: String,
    pub ok: bool,
    pub checks: Vec<CheckResult>,
}

/// Binary readiness verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtgStatus {
    pub good_to_go: bool,
    /// Diagnostic of the first failing check.
    pub message: Option<String>,
}

impl GtgStatus {
    pub fn good() -> Self {
        Self {
            good_to_go: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            good_to_go: false,
            message: Some(message.into()),
        }
    }
}

pub struct HealthService {
    system_code: String,
    name: String,
    description: String,
    source: HealthCheck,
    sink: HealthCheck,
    probe_timeout: Duration,
    observer: Arc<dyn Observer>,
}

impl HealthService {
    pub fn new(
        system_code: impl Into<String>,
        name: impl Into<String>,
        source: HealthCheck,
        sink: HealthCheck,
        observer: Arc<dyn Observer>,
    ) -> Self {
        Self {
            system_code: system_code.into(),
            name: name.into(),
            description: "Bridge for forwarding messages between kafka-proxy instances".into(),
            source,
            sink,
            probe_timeout: PROBE_TIMEOUT,
            observer,
        }
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    /// Evaluate every check. Failures are reported in the payload only.
    pub async fn report(&self) -> HealthReport {
        let (source, sink) = join(self.evaluate(&self.source), self.evaluate(&self.sink)).await;
        let checks = vec![source, sink];
        HealthReport {
            schema_version: HEALTH_SCHEMA_VERSION,
            system_code: self.system_code.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            ok: checks.iter().all(|check| check.ok),
            checks,
        }
    }

    /// Fail-fast readiness: the first failing probe decides the outcome.
    pub async fn gtg(&self) -> GtgStatus {
        let probes = try_join(
            self.source.probe(self.probe_timeout),
            self.sink.probe(self.probe_timeout),
        );
        match probes.await {
            Ok(_) => GtgStatus::good(),
            Err(e) => {
                let message = e.to_string();
                self.observer.record_event(&BridgeEvent::HealthCheckFailed {
                    check: "gtg".into(),
                    error: message.clone(),
                });
                GtgStatus::failed(message)
            }
        }
    }

    async fn evaluate(&self, check: &HealthCheck) -> CheckResult {
        let (ok, check_output) = match check.probe(self.probe_timeout).await {
            Ok(output) => (true, output),
            Err(e) => {
                let output = e.to_string();
                self.observer.record_event(&BridgeEvent::HealthCheckFailed {
                    check: check.name.clone(),
                    error: output.clone(),
                });
                (false, output)
            }
        };
        CheckResult {
            id: check.id.clone(),
            name: check.name.clone(),
            ok,
            severity: check.severity,
            business_impact: check.business_impact.clone(),
            technical_summary: check.technical_summary.clone(),
            panic_guide: check.panic_guide.clone(),
            check_output,
            last_updated: Utc::now().to_rfc3339(),
        }
    }
}
