use super::Config;
use crate::error::ConfigError;
use crate::transport::sinks::SinkKind;

impl Config {
    /// Reject wiring that cannot start. Every failure here is fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::Validation("service_name must not be empty".into()));
        }
        if self
            .consumer
            .addresses
            .iter()
            .all(|addr| addr.trim().is_empty())
        {
            return Err(ConfigError::Validation(
                "consumer.addresses must contain at least one address".into(),
            ));
        }
        if self.consumer.group_id.trim().is_empty() {
            return Err(ConfigError::Validation("consumer.group_id must not be empty".into()));
        }
        if self.consumer.topic.trim().is_empty() {
            return Err(ConfigError::Validation("consumer.topic must not be empty".into()));
        }
        if self.sink.address.trim().is_empty() {
            return Err(ConfigError::Validation("sink.address must not be empty".into()));
        }

        self.region()?;
        let kind = self.sink_kind()?;
        if kind == SinkKind::Proxy
            && self
                .sink
                .topic
                .as_deref()
                .is_none_or(|topic| topic.trim().is_empty())
        {
            return Err(ConfigError::Validation(
                "sink.topic is required for the proxy sink".into(),
            ));
        }
        Ok(())
    }
}
