use serde::{Deserialize, Serialize};

/// Where consumed messages are forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// `proxy` or `plainHTTP` (default: proxy)
    #[serde(default = "default_sink_kind")]
    pub kind: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub authorization: Option<String>,
    /// Host header override.
    #[serde(default)]
    pub queue: Option<String>,
    /// Destination topic; required by the proxy sink.
    #[serde(default)]
    pub topic: Option<String>,
}

fn default_sink_kind() -> String {
    "proxy".into()
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            kind: default_sink_kind(),
            address: String::new(),
            authorization: None,
            queue: None,
            topic: None,
        }
    }
}
