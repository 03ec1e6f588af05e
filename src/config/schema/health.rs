use crate::diagnostics::health::DEFAULT_PANIC_GUIDE;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Defaults to the service name.
    #[serde(default)]
    pub system_code: Option<String>,
    #[serde(default = "default_panic_guide")]
    pub panic_guide: String,
}

fn default_panic_guide() -> String {
    DEFAULT_PANIC_GUIDE.into()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            system_code: None,
            panic_guide: default_panic_guide(),
        }
    }
}
