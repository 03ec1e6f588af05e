use super::Config;
use crate::error::ConfigError;
use std::fs;
use std::path::Path;

impl Config {
    /// Resolve configuration once: TOML file (optional), then environment
    /// overrides, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|e| {
                    ConfigError::Load(format!("failed to read {}: {e}", path.display()))
                })?;
                Self::from_toml_str(&contents)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
