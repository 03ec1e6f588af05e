//! Bridge orchestrator: wires source, sink, forwarder, consumer loop and
//! health aggregation, then runs the loop and the admin endpoints side by
//! side until shutdown.

mod signal;

pub use signal::wait_for_shutdown_signal;

use crate::config::Config;
use crate::core::consumer_loop::ConsumerLoop;
use crate::core::forwarder::Forwarder;
use crate::diagnostics::health::{HealthCheck, HealthService};
use crate::runtime::observability::Observer;
use crate::transport::gateway::{AppState, run_gateway_with_listener};
use crate::transport::http_client::build_bridge_client_with;
use crate::transport::sinks::{Sink, create_sink};
use crate::transport::source::{MessageSource, ProxyConsumer};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub struct Bridge {
    config: Arc<Config>,
    consumer: Arc<ConsumerLoop>,
    health: Arc<HealthService>,
}

impl Bridge {
    /// Build the production wiring. Unknown sink kinds and regions fail here.
    pub fn from_config(config: Config, observer: Arc<dyn Observer>) -> crate::Result<Self> {
        let kind = config.sink_kind()?;
        let client = build_bridge_client_with(config.http_settings());
        let source: Arc<dyn MessageSource> =
            Arc::new(ProxyConsumer::new(config.consumer_settings(), client.clone()));
        let sink = create_sink(kind, config.sink_config(), client, Arc::clone(&observer));
        Self::from_parts(config, source, sink, observer)
    }

    /// Wire an explicit source and sink.
    pub fn from_parts(
        config: Config,
        source: Arc<dyn MessageSource>,
        sink: Arc<dyn Sink>,
        observer: Arc<dyn Observer>,
    ) -> crate::Result<Self> {
        let region = config.region()?;
        let panic_guide = config.health.panic_guide.clone();

        let health = HealthService::new(
            config.system_code(),
            config.service_name.clone(),
            HealthCheck::source(Arc::clone(&source), &panic_guide),
            HealthCheck::sink(Arc::clone(&sink), &panic_guide),
            Arc::clone(&observer),
        );
        let forwarder = Arc::new(Forwarder::new(sink, region, Arc::clone(&observer)));
        let consumer = ConsumerLoop::new(source, forwarder, config.dispatch_mode(), observer);

        Ok(Self {
            config: Arc::new(config),
            consumer: Arc::new(consumer),
            health: Arc::new(health),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn health(&self) -> &Arc<HealthService> {
        &self.health
    }

    pub fn consumer(&self) -> &Arc<ConsumerLoop> {
        &self.consumer
    }

    /// Bind the configured admin address and run until `shutdown` fires.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("bind admin endpoints on {addr}"))?;
        self.run_with_listener(listener, shutdown).await
    }

    /// Returns only after the consumer loop has drained its current batch and
    /// the admin server has stopped.
    pub async fn run_with_listener(
        &self,
        listener: TcpListener,
        shutdown: CancellationToken,
    ) -> Result<()> {
        tracing::info!(
            service_name = %self.config.service_name,
            region = self.config.region.as_deref().unwrap_or("none"),
            sink = %self.config.sink.kind,
            "starting bridge"
        );

        let consumer = Arc::clone(&self.consumer);
        let loop_shutdown = shutdown.clone();
        let consumer_task = tokio::spawn(async move { consumer.run(loop_shutdown).await });

        let state = AppState::new(Arc::clone(&self.health), &self.config.service_name);
        let served = run_gateway_with_listener(listener, state, shutdown.clone()).await;
        if served.is_err() {
            shutdown.cancel();
        }

        consumer_task.await.context("join consumer loop")?;
        tracing::info!("bridge stopped");
        served
    }
}
