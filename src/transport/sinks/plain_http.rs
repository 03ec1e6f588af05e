use super::traits::{Sink, SinkConfig, SinkKind};
use crate::core::message::{
    CONTENT_TYPE, MESSAGE_TIMESTAMP, Message, NATIVE_HASH, ORIGIN_SYSTEM_ID,
};
use crate::error::{ProbeError, SinkError};
use crate::runtime::observability::{BridgeEvent, Observer};
use crate::transport::http_client::{host_override, normalize_address};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use std::sync::Arc;

/// Sink that turns each queue message into `POST <address>/notify`.
pub struct PlainHttpSink {
    config: SinkConfig,
    address: String,
    client: Client,
    observer: Arc<dyn Observer>,
}

impl PlainHttpSink {
    pub fn new(config: SinkConfig, client: Client, observer: Arc<dyn Observer>) -> Self {
        let address = normalize_address(&config.address);
        Self {
            config,
            address,
            client,
            observer,
        }
    }

    fn notify_url(&self) -> String {
        format!("{}/notify", self.address)
    }

    fn health_url(&self) -> String {
        format!("{}/__health", self.address)
    }

    fn build_request(&self, message: &Message, tid: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .post(self.notify_url())
            .body(message.body.clone())
            .header("X-Request-Id", tid);

        match message.header(ORIGIN_SYSTEM_ID) {
            Some(origin) => request = request.header("X-Origin-System-Id", origin),
            None => self.observer.record_event(&BridgeEvent::OriginSystemMissing {
                transaction_id: tid.to_string(),
            }),
        }
        if let Some(timestamp) = message.header(MESSAGE_TIMESTAMP) {
            request = request.header(MESSAGE_TIMESTAMP, timestamp);
        }
        if let Some(auth) = self.config.authorization() {
            request = request.header(header::AUTHORIZATION, auth);
        }
        if let Some(hash) = message.header(NATIVE_HASH) {
            request = request.header("X-Native-Hash", hash);
        }
        if let Some(content_type) = message.header(CONTENT_TYPE) {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(host) = host_override(self.config.queue.as_deref()) {
            request = request.header(header::HOST, host);
        }
        request
    }
}

#[async_trait]
impl Sink for PlainHttpSink {
    fn kind(&self) -> SinkKind {
        SinkKind::PlainHttp
    }

    async fn send(&self, message: &Message) -> Result<(), SinkError> {
        let tid = message.transaction_id().unwrap_or_default();

        let response = self
            .build_request(message, tid)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    SinkError::Request {
                        transaction_id: tid.to_string(),
                        message: e.to_string(),
                    }
                } else {
                    SinkError::Transport {
                        transaction_id: tid.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        // Drain before the connection goes back to the pool.
        let _ = response.bytes().await;

        if !status.is_success() {
            return Err(SinkError::Status {
                transaction_id: tid.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn connectivity_check(&self) -> Result<String, ProbeError> {
        let target = self.health_url();
        let mut request = self.client.get(&target);
        if let Some(auth) = self.config.authorization() {
            request = request.header(header::AUTHORIZATION, auth);
        }
        if let Some(host) = host_override(self.config.queue.as_deref()) {
            request = request.header(header::HOST, host);
        }

        let response = request.send().await.map_err(|e| ProbeError::Transport {
            target: target.clone(),
            message: e.to_string(),
        })?;
        let status = response.status();
        let _ = response.bytes().await;

        if status != StatusCode::OK {
            return Err(ProbeError::Status {
                target,
                status: status.as_u16(),
            });
        }
        Ok(format!("Forwarding to {} is possible", self.address))
    }
}
