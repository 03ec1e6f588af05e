//! Consumer for the Kafka REST proxy (v1 consumer API).
//!
//! A consumer instance is created lazily under the configured group, records
//! are fetched from `<instance>/topics/<topic>` and decoded from base64
//! `FTMSG/1.0` frames. Any failed request discards the instance so the next
//! poll starts over, on the next configured address.

use super::traits::MessageSource;
use crate::core::message::{Message, codec};
use crate::error::{ConsumerError, ProbeError};
use crate::transport::http_client::normalize_address;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use std::fmt::Write as _;
use std::time::Duration;
use tokio::sync::Mutex;

const KAFKA_V1_CONTENT_TYPE: &str = "application/vnd.kafka.v1+json";

/// Settings for [`ProxyConsumer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConsumerSettings {
    pub addresses: Vec<String>,
    pub group_id: String,
    pub topic: String,
    /// `auto.offset.reset` for new instances (`largest` / `smallest`).
    pub offset: String,
    pub auto_commit: bool,
    pub authorization_key: Option<String>,
    pub backoff: Duration,
}

#[derive(Debug, Deserialize)]
struct CreateInstanceResponse {
    #[serde(default)]
    instance_id: String,
    base_uri: String,
}

#[derive(Debug, Deserialize)]
struct ConsumedRecord {
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    partition: Option<i64>,
    #[serde(default)]
    offset: Option<i64>,
}

#[derive(Debug, Clone)]
struct ConsumerInstance {
    id: String,
    uri: String,
}

#[derive(Debug, Default)]
struct ConsumerState {
    instance: Option<ConsumerInstance>,
    address_index: usize,
}

pub struct ProxyConsumer {
    settings: ProxyConsumerSettings,
    addresses: Vec<String>,
    client: Client,
    state: Mutex<ConsumerState>,
}

impl ProxyConsumer {
    pub fn new(settings: ProxyConsumerSettings, client: Client) -> Self {
        let addresses = settings
            .addresses
            .iter()
            .map(|address| normalize_address(address))
            .collect();
        Self {
            settings,
            addresses,
            client,
            state: Mutex::new(ConsumerState::default()),
        }
    }

    fn authorization(&self) -> Option<&str> {
        self.settings
            .authorization_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }

    fn with_auth(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(key) = self.authorization() {
            request = request.header(header::AUTHORIZATION, key);
        }
        request
    }

    async fn create_instance(&self, address: &str) -> Result<ConsumerInstance, ConsumerError> {
        let target = format!("{address}/consumers/{}", self.settings.group_id);
        let body = serde_json::json!({
            "auto.offset.reset": self.settings.offset,
            "auto.commit.enable": self.settings.auto_commit.to_string(),
        });

        let response = self
            .with_auth(self.client.post(&target))
            .header(header::CONTENT_TYPE, KAFKA_V1_CONTENT_TYPE)
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| transport_error(&target, &e))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if status != StatusCode::OK {
            return Err(ConsumerError::Status {
                target,
                status: status.as_u16(),
                body: text,
            });
        }

        let created: CreateInstanceResponse = serde_json::from_str(&text)
            .map_err(|e| ConsumerError::Decode(format!("create instance response: {e}")))?;
        let uri = reroot_instance_uri(address, &created.base_uri)?;
        tracing::info!(instance = %created.instance_id, uri = %uri, "created consumer instance");

        Ok(ConsumerInstance {
            id: created.instance_id,
            uri,
        })
    }

    async fn fetch(&self, instance: &ConsumerInstance) -> Result<Vec<Message>, ConsumerError> {
        let target = format!("{}/topics/{}", instance.uri, self.settings.topic);
        let response = self
            .with_auth(self.client.get(&target))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| transport_error(&target, &e))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if status != StatusCode::OK {
            return Err(ConsumerError::Status {
                target,
                status: status.as_u16(),
                body: text,
            });
        }

        let records: Vec<ConsumedRecord> = serde_json::from_str(&text)
            .map_err(|e| ConsumerError::Decode(format!("consumed records: {e}")))?;

        if !records.is_empty() && !self.settings.auto_commit {
            self.commit_offsets(instance).await?;
        }

        Ok(records.iter().filter_map(decode_record).collect())
    }

    async fn commit_offsets(&self, instance: &ConsumerInstance) -> Result<(), ConsumerError> {
        let target = format!("{}/offsets", instance.uri);
        let response = self
            .with_auth(self.client.post(&target))
            .header(header::CONTENT_TYPE, KAFKA_V1_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| transport_error(&target, &e))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if status != StatusCode::OK {
            return Err(ConsumerError::Status {
                target,
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(())
    }

    async fn destroy_instance(&self, instance: &ConsumerInstance) {
        match self.with_auth(self.client.delete(&instance.uri)).send().await {
            Ok(response) => {
                let _ = response.bytes().await;
                tracing::debug!(instance = %instance.id, "destroyed consumer instance");
            }
            Err(e) => {
                tracing::warn!(instance = %instance.id, "could not destroy consumer instance: {e}");
            }
        }
    }

    async fn poll_once(&self, state: &mut ConsumerState) -> Result<Vec<Message>, ConsumerError> {
        let instance = match &state.instance {
            Some(instance) => instance.clone(),
            None => {
                let address = self
                    .addresses
                    .get(state.address_index)
                    .ok_or_else(|| ConsumerError::Instance("no source address configured".into()))?;
                let created = self.create_instance(address).await?;
                state.instance = Some(created.clone());
                created
            }
        };
        self.fetch(&instance).await
    }

    async fn reset(&self, state: &mut ConsumerState) {
        if let Some(instance) = state.instance.take() {
            self.destroy_instance(&instance).await;
        }
        if !self.addresses.is_empty() {
            state.address_index = (state.address_index + 1) % self.addresses.len();
        }
    }

    async fn probe_address(&self, address: &str) -> Result<String, ProbeError> {
        let target = format!("{address}/topics");
        let response = self
            .with_auth(self.client.get(&target))
            .send()
            .await
            .map_err(|e| ProbeError::Transport {
                target: target.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if status != StatusCode::OK {
            return Err(ProbeError::Status {
                target,
                status: status.as_u16(),
            });
        }

        ensure_topic_present(&target, &text, &self.settings.topic)?;
        Ok(format!(
            "Connected to kafka-proxy at {address}, topic {} is present",
            self.settings.topic
        ))
    }
}

#[async_trait]
impl MessageSource for ProxyConsumer {
    async fn next_batch(&self) -> Result<Vec<Message>, ConsumerError> {
        let mut state = self.state.lock().await;
        let result = self.poll_once(&mut state).await;
        if result.is_err() {
            self.reset(&mut state).await;
        }
        drop(state);

        if !matches!(&result, Ok(batch) if !batch.is_empty()) {
            tokio::time::sleep(self.settings.backoff).await;
        }
        result
    }

    async fn connectivity_check(&self) -> Result<String, ProbeError> {
        let mut failures = String::new();
        for address in &self.addresses {
            match self.probe_address(address).await {
                Ok(message) => return Ok(message),
                Err(e) => {
                    let _ = writeln!(failures, "For {address} there is an error {e}");
                }
            }
        }
        if failures.is_empty() {
            failures.push_str("no source address configured");
        }
        Err(ProbeError::AllFailed(failures.trim_end().to_string()))
    }

    async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        if let Some(instance) = state.instance.take() {
            self.destroy_instance(&instance).await;
        }
    }
}

fn transport_error(target: &str, error: &reqwest::Error) -> ConsumerError {
    ConsumerError::Transport {
        target: target.to_string(),
        message: error.to_string(),
    }
}

/// The proxy reports its own view of the host in `base_uri`; keep only the
/// path and put it behind the address the instance was created through.
fn reroot_instance_uri(address: &str, base_uri: &str) -> Result<String, ConsumerError> {
    let path = match url::Url::parse(base_uri) {
        Ok(parsed) => parsed.path().to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => base_uri.to_string(),
        Err(e) => {
            return Err(ConsumerError::Instance(format!(
                "invalid base_uri {base_uri:?}: {e}"
            )));
        }
    };
    let path = path.trim_end_matches('/');
    if path.is_empty() {
        return Err(ConsumerError::Instance(format!(
            "base_uri {base_uri:?} has no path"
        )));
    }
    if path.starts_with('/') {
        Ok(format!("{address}{path}"))
    } else {
        Ok(format!("{address}/{path}"))
    }
}

fn decode_record(record: &ConsumedRecord) -> Option<Message> {
    let value = record.value.as_deref()?;
    let bytes = match STANDARD.decode(value) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(
                partition = ?record.partition,
                offset = ?record.offset,
                "skipping record with invalid base64 value: {e}"
            );
            return None;
        }
    };
    let decoded = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                partition = ?record.partition,
                offset = ?record.offset,
                "skipping record that is not valid UTF-8: {e}"
            );
            return None;
        }
    };
    match codec::decode(&decoded) {
        Ok(message) => Some(message),
        Err(e) => {
            tracing::warn!(
                partition = ?record.partition,
                offset = ?record.offset,
                "skipping undecodable record: {e}"
            );
            None
        }
    }
}

pub(crate) fn ensure_topic_present(target: &str, body: &str, topic: &str) -> Result<(), ProbeError> {
    let topics: Vec<String> = serde_json::from_str(body).map_err(|e| ProbeError::Parse {
        target: target.to_string(),
        message: e.to_string(),
    })?;
    if topics.iter().any(|t| t == topic) {
        Ok(())
    } else {
        Err(ProbeError::TopicMissing {
            target: target.to_string(),
            topic: topic.to_string(),
        })
    }
}
