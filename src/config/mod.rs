pub mod app;
pub mod runner;
pub mod target;

use thiserror::Error;

pub use app::{AppConfig, AppMetadata, ObservabilityConfig, LogFormat};
pub use runner::{RunnerConfig, ServiceConfig};
pub use target::{CredentialsConfig, TargetConfig};

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// Configuration sections check their own invariants
pub trait Validate {
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Configuration sections that can be built entirely from defaults
pub trait WithDefaults {
    fn with_defaults() -> Self;
}

/// Load the application configuration from files and environment variables
pub fn load() -> Result<AppConfig, ConfigError> {
    app::load_config()
}
