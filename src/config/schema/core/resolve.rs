use super::Config;
use crate::core::consumer_loop::DispatchMode;
use crate::core::enrich::Region;
use crate::error::ConfigError;
use crate::transport::http_client::HttpClientSettings;
use crate::transport::sinks::{SinkConfig, SinkKind};
use crate::transport::source::ProxyConsumerSettings;
use std::str::FromStr;
use std::time::Duration;

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

impl Config {
    pub fn region(&self) -> Result<Option<Region>, ConfigError> {
        Region::parse_optional(self.region.as_deref())
    }

    pub fn sink_kind(&self) -> Result<SinkKind, ConfigError> {
        let raw = self.sink.kind.trim();
        SinkKind::from_str(raw).map_err(|_| ConfigError::UnknownSinkKind(raw.to_string()))
    }

    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            address: self.sink.address.trim().to_string(),
            authorization: non_blank(self.sink.authorization.as_ref()),
            queue: non_blank(self.sink.queue.as_ref()),
            topic: non_blank(self.sink.topic.as_ref()),
        }
    }

    pub fn consumer_settings(&self) -> ProxyConsumerSettings {
        ProxyConsumerSettings {
            addresses: self
                .consumer
                .addresses
                .iter()
                .map(|addr| addr.trim())
                .filter(|addr| !addr.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
            group_id: self.consumer.group_id.clone(),
            topic: self.consumer.topic.clone(),
            offset: self.consumer.offset.clone(),
            auto_commit: self.consumer.auto_commit,
            authorization_key: non_blank(self.consumer.authorization_key.as_ref()),
            backoff: Duration::from_secs(self.consumer.backoff_secs),
        }
    }

    pub fn http_settings(&self) -> HttpClientSettings {
        HttpClientSettings {
            timeout_secs: self.http.timeout_secs,
            max_idle_per_host: self.http.max_idle_per_host,
            keepalive_secs: self.http.keepalive_secs,
        }
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        if self.consumer.concurrent_dispatch {
            DispatchMode::Concurrent
        } else {
            DispatchMode::Sequential
        }
    }

    pub fn system_code(&self) -> &str {
        self.health
            .system_code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
            .unwrap_or(&self.service_name)
    }
}
