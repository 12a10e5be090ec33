use serde::{Deserialize, Serialize};

use super::{ConfigError, Validate, WithDefaults};

/// Where the server under test lives and how its routes are laid out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Scheme, host and port, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Prefix of the generic API routes (`/status`, `/admin/...`)
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Prefix of the authentication routes (`/login`, `/tokens`, ...)
    #[serde(default = "default_auth_prefix")]
    pub auth_prefix: String,
    /// Path of the Swagger document
    #[serde(default = "default_specs_path")]
    pub specs_path: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Default account of the server under test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_auth_prefix() -> String {
    "/auth".to_string()
}

fn default_specs_path() -> String {
    "/api/specs".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_username() -> String {
    "user@nomail.org".to_string()
}

fn default_password() -> String {
    "test".to_string()
}

impl TargetConfig {
    /// Full URL of a path on the target
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// `{api}/{endpoint}`, tolerant of a leading slash on `endpoint`
    pub fn api(&self, endpoint: &str) -> String {
        join(&self.api_prefix, endpoint)
    }

    /// `{auth}/{endpoint}`, tolerant of a leading slash on `endpoint`
    pub fn auth(&self, endpoint: &str) -> String {
        join(&self.auth_prefix, endpoint)
    }
}

fn join(prefix: &str, endpoint: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');

    if endpoint.is_empty() {
        prefix.to_string()
    } else {
        format!("{}/{}", prefix, endpoint)
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            auth_prefix: default_auth_prefix(),
            specs_path: default_specs_path(),
            timeout: default_timeout(),
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

impl WithDefaults for TargetConfig {
    fn with_defaults() -> Self {
        Self::default()
    }
}

impl WithDefaults for CredentialsConfig {
    fn with_defaults() -> Self {
        Self::default()
    }
}

impl Validate for TargetConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(
                "target.base_url must start with http:// or https://".to_string(),
            ));
        }
        for (name, value) in [
            ("target.api_prefix", &self.api_prefix),
            ("target.auth_prefix", &self.auth_prefix),
            ("target.specs_path", &self.specs_path),
        ] {
            if !value.starts_with('/') {
                return Err(ConfigError::ValidationError(format!(
                    "{} must start with '/'",
                    name
                )));
            }
        }
        if self.timeout == 0 {
            return Err(ConfigError::ValidationError("target.timeout must be > 0".to_string()));
        }
        Ok(())
    }
}

impl Validate for CredentialsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() {
            return Err(ConfigError::ValidationError("credentials.username cannot be empty".to_string()));
        }
        if self.password.is_empty() {
            return Err(ConfigError::ValidationError("credentials.password cannot be empty".to_string()));
        }
        Ok(())
    }
}
