//! Environment-driven settings.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATE_DIR: &str = ".bambugoods";

#[derive(Clone, Debug, Validate)]
pub struct Config {
    /// Backend origin; the API lives under `{backend_url}/api`.
    #[validate(url)]
    pub backend_url: String,
    #[validate(range(min = 1, max = 120))]
    pub request_timeout_secs: u64,
    pub port: u16,
    pub state_dir: PathBuf,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

impl Config {
    pub fn new(backend_url: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            backend_url: backend_url.into().trim_end_matches('/').to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            port: DEFAULT_PORT,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
        };
        config.check()?;
        Ok(config)
    }

    /// Reads `BACKEND_URL`, `REQUEST_TIMEOUT_SECS`, `PORT` and `STATE_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend_url = lookup("BACKEND_URL").filter(|v| !v.trim().is_empty()).ok_or(ConfigError::Missing("BACKEND_URL"))?;
        let mut config = Self::new(backend_url)?;
        if let Some(v) = lookup("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = v.trim().parse().map_err(|_| ConfigError::Invalid { name: "REQUEST_TIMEOUT_SECS", value: v })?;
        }
        if let Some(v) = lookup("PORT") {
            config.port = v.trim().parse().map_err(|_| ConfigError::Invalid { name: "PORT", value: v })?;
        }
        if let Some(v) = lookup("STATE_DIR") {
            config.state_dir = PathBuf::from(v);
        }
        config.check()?;
        Ok(config)
    }

    pub fn api_base(&self) -> String { format!("{}/api", self.backend_url) }
    pub fn timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }

    fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            return Err(ConfigError::Invalid { name: "BACKEND_URL", value: self.backend_url.clone() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let c = Config::from_lookup(lookup(&[("BACKEND_URL", "https://api.bambugoods.es/")])).unwrap();
        assert_eq!(c.api_base(), "https://api.bambugoods.es/api");
        assert_eq!(c.timeout(), Duration::from_secs(10));
        assert_eq!(c.port, 3000);
    }

    #[test]
    fn test_missing_backend_url() {
        assert!(matches!(Config::from_lookup(lookup(&[])), Err(ConfigError::Missing("BACKEND_URL"))));
        assert!(matches!(Config::from_lookup(lookup(&[("BACKEND_URL", " ")])), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_malformed_values() {
        assert!(Config::new("not a url").is_err());
        assert!(Config::new("ftp://files.example").is_err());
        let bad_port = Config::from_lookup(lookup(&[("BACKEND_URL", "http://localhost:8001"), ("PORT", "eighty")]));
        assert!(matches!(bad_port, Err(ConfigError::Invalid { name: "PORT", .. })));
        let zero_timeout = Config::from_lookup(lookup(&[("BACKEND_URL", "http://localhost:8001"), ("REQUEST_TIMEOUT_SECS", "0")]));
        assert!(matches!(zero_timeout, Err(ConfigError::Validation(_))));
    }
}
