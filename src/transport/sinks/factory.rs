use super::plain_http::PlainHttpSink;
use super::proxy::ProxySink;
use super::traits::{Sink, SinkConfig, SinkKind};
use crate::runtime::observability::Observer;
use reqwest::Client;
use std::sync::Arc;

/// Resolve the configured destination into a concrete sink, once, at startup.
pub fn create_sink(
    kind: SinkKind,
    config: SinkConfig,
    client: Client,
    observer: Arc<dyn Observer>,
) -> Arc<dyn Sink> {
    match kind {
        SinkKind::Proxy => Arc::new(ProxySink::new(config, client)),
        SinkKind::PlainHttp => Arc::new(PlainHttpSink::new(config, client, observer)),
    }
}
