use serde::{Deserialize, Serialize};

use super::{ConfigError, Validate, WithDefaults};

/// How the suite is driven
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Wait for the server to report alive before the first case
    #[serde(default)]
    pub wait: bool,
    /// Give up waiting after this many seconds
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout: u64,
    /// Pause between two probes, in milliseconds
    #[serde(default = "default_wait_interval")]
    pub wait_interval: u64,
    /// Number of fresh logins issued before listing tokens
    #[serde(default = "default_token_count")]
    pub token_count: usize,
    /// Backend service that gates the admin-users case
    #[serde(default = "default_admin_service")]
    pub admin_service: String,
}

/// A backing service of the server under test
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_service_host")]
    pub host: String,
    /// Left at 0 when unset, which validation rejects
    #[serde(default)]
    pub port: u16,
}

fn default_wait_timeout() -> u64 {
    60
}

fn default_wait_interval() -> u64 {
    1000
}

fn default_token_count() -> usize {
    3
}

fn default_admin_service() -> String {
    "neo4j".to_string()
}

fn default_service_host() -> String {
    "localhost".to_string()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            wait: false,
            wait_timeout: default_wait_timeout(),
            wait_interval: default_wait_interval(),
            token_count: default_token_count(),
            admin_service: default_admin_service(),
        }
    }
}

impl WithDefaults for RunnerConfig {
    fn with_defaults() -> Self {
        Self::default()
    }
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.wait_timeout == 0 {
            return Err(ConfigError::ValidationError("runner.wait_timeout must be > 0".to_string()));
        }
        if self.wait_interval == 0 {
            return Err(ConfigError::ValidationError("runner.wait_interval must be > 0".to_string()));
        }
        // the tokens case needs a second token besides the one it keeps
        if self.token_count < 2 {
            return Err(ConfigError::ValidationError("runner.token_count must be >= 2".to_string()));
        }
        if self.admin_service.is_empty() {
            return Err(ConfigError::ValidationError("runner.admin_service cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl ServiceConfig {
    /// Validate the entry registered as `services.<name>`
    pub fn validate_named(&self, name: &str) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "services.{}.host cannot be empty",
                name
            )));
        }
        if self.port == 0 {
            return Err(ConfigError::ValidationError(format!(
                "services.{}.port must be > 0",
                name
            )));
        }
        Ok(())
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_named("*")
    }
}
