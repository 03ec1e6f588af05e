use super::traits::{Sink, SinkConfig, SinkKind};
use crate::core::message::{Message, codec};
use crate::error::{ProbeError, SinkError};
use crate::transport::http_client::{host_override, normalize_address};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode, header};
use serde::Serialize;

const KAFKA_BINARY_CONTENT_TYPE: &str = "application/vnd.kafka.binary.v1+json";

#[derive(Debug, Serialize)]
struct ProduceRequest {
    records: Vec<ProduceRecord>,
}

#[derive(Debug, Serialize)]
struct ProduceRecord {
    value: String,
}

/// Sink that republishes messages through a downstream Kafka REST proxy.
pub struct ProxySink {
    config: SinkConfig,
    address: String,
    topic: String,
    client: Client,
}

impl ProxySink {
    pub fn new(config: SinkConfig, client: Client) -> Self {
        let address = normalize_address(&config.address);
        let topic = config.topic.clone().unwrap_or_default();
        Self {
            config,
            address,
            topic,
            client,
        }
    }

    fn produce_url(&self) -> String {
        format!("{}/topics/{}", self.address, self.topic)
    }

    fn topics_url(&self) -> String {
        format!("{}/topics", self.address)
    }

    fn with_routing(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(auth) = self.config.authorization() {
            request = request.header(header::AUTHORIZATION, auth);
        }
        if let Some(host) = host_override(self.config.queue.as_deref()) {
            request = request.header(header::HOST, host);
        }
        request
    }
}

pub(crate) fn produce_body(message: &Message) -> Result<String, SinkError> {
    let framed = codec::encode(message).map_err(|e| SinkError::Encode(e.to_string()))?;
    let payload = ProduceRequest {
        records: vec![ProduceRecord {
            value: STANDARD.encode(framed.as_bytes()),
        }],
    };
    serde_json::to_string(&payload).map_err(|e| SinkError::Encode(e.to_string()))
}

#[async_trait]
impl Sink for ProxySink {
    fn kind(&self) -> SinkKind {
        SinkKind::Proxy
    }

    async fn send(&self, message: &Message) -> Result<(), SinkError> {
        let tid = message.transaction_id().unwrap_or_default();
        let body = produce_body(message)?;

        let request = self
            .client
            .post(self.produce_url())
            .header(header::CONTENT_TYPE, KAFKA_BINARY_CONTENT_TYPE)
            .body(body);
        let response = self
            .with_routing(request)
            .send()
            .await
            .map_err(|e| SinkError::Transport {
                transaction_id: tid.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
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
        let target = self.topics_url();
        let response = self
            .with_routing(self.client.get(&target))
            .send()
            .await
            .map_err(|e| ProbeError::Transport {
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
        Ok(format!("Connected to kafka-proxy at {}", self.address))
    }
}
