use super::super::{ConsumerConfig, DestinationConfig, HealthConfig, HttpConfig, ServerConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Service name used in logs and the health report (default: kafka-bridge)
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// trace | debug | info | warn | error (default: info)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// `eu` or `us`; unset disables loop prevention.
    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub consumer: ConsumerConfig,
    #[serde(default)]
    pub sink: DestinationConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

fn default_service_name() -> String {
    "kafka-bridge".into()
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_level: default_log_level(),
            region: None,
            server: ServerConfig::default(),
            consumer: ConsumerConfig::default(),
            sink: DestinationConfig::default(),
            http: HttpConfig::default(),
            health: HealthConfig::default(),
        }
    }
}
