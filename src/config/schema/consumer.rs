use serde::{Deserialize, Serialize};

/// Source queue proxy consumer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerConfig {
    /// Queue proxy base addresses, tried in order.
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub topic: String,
    /// `auto.offset.reset` for new consumer instances (default: largest)
    #[serde(default = "default_offset")]
    pub offset: String,
    #[serde(default = "default_true")]
    pub auto_commit: bool,
    #[serde(default)]
    pub authorization_key: Option<String>,
    /// Pause after a failed or empty poll (default: 8)
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
    /// Fan each batch out onto concurrent tasks (default: false)
    #[serde(default)]
    pub concurrent_dispatch: bool,
}

fn default_offset() -> String {
    "largest".into()
}

fn default_true() -> bool {
    true
}

fn default_backoff_secs() -> u64 {
    8
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            addresses: Vec::new(),
            group_id: String::new(),
            topic: String::new(),
            offset: default_offset(),
            auto_commit: true,
            authorization_key: None,
            backoff_secs: default_backoff_secs(),
            concurrent_dispatch: false,
        }
    }
}
