use serde::{Deserialize, Serialize};

/// Outbound client pool shared by the consumer, the sink and the probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_idle_per_host")]
    pub max_idle_per_host: usize,
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_idle_per_host() -> usize {
    100
}

fn default_keepalive_secs() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_idle_per_host: default_max_idle_per_host(),
            keepalive_secs: default_keepalive_secs(),
        }
    }
}
