use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_IDLE_PER_HOST: usize = 100;
pub const DEFAULT_KEEPALIVE_SECS: u64 = 30;

/// Connection-pool settings for the client shared by consumer, sinks and probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpClientSettings {
    pub timeout_secs: u64,
    pub max_idle_per_host: usize,
    pub keepalive_secs: u64,
}

impl Default for HttpClientSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_idle_per_host: DEFAULT_MAX_IDLE_PER_HOST,
            keepalive_secs: DEFAULT_KEEPALIVE_SECS,
        }
    }
}

pub fn build_bridge_client() -> Client {
    build_bridge_client_with(HttpClientSettings::default())
}

pub fn build_bridge_client_with(settings: HttpClientSettings) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(settings.max_idle_per_host)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(settings.keepalive_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Strip surrounding slashes and default to `http://` when no scheme is given.
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim().trim_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

/// Host header override, ignoring blank configuration values.
pub(crate) fn host_override(queue: Option<&str>) -> Option<&str> {
    queue.map(str::trim).filter(|q| !q.is_empty())
}
