//! Configuration loading tests
//!
//! These tests mutate process environment variables, so they run serially.

use authflow::config::*;
use serial_test::serial;
use std::env;

mod utils {
    /// Clean up environment variables with AUTHFLOW prefix
    pub fn clean_env_vars() {
        let keys: Vec<String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("AUTHFLOW"))
            .map(|(k, _)| k)
            .collect();

        for key in keys {
            unsafe { std::env::remove_var(&key) };
        }
        unsafe { std::env::remove_var("APP_ENV") };
    }
}

// =============================================================================
// Loading Default Configuration
// =============================================================================

#[test]
#[serial]
fn test_load_default_config_success() {
    utils::clean_env_vars();

    let config = load();
    assert!(config.is_ok(), "Failed to load default configuration: {:?}", config.err());
    let config = config.unwrap();

    assert_eq!(config.app.name, "authflow");
    assert_eq!(config.app.environment, "development");

    assert_eq!(config.target.base_url, "http://localhost:8080");
    assert_eq!(config.target.api_prefix, "/api");
    assert_eq!(config.target.auth_prefix, "/auth");
    assert_eq!(config.target.specs_path, "/api/specs");
    assert_eq!(config.target.timeout, 10);

    assert_eq!(config.credentials.username, "user@nomail.org");

    assert!(!config.runner.wait);
    assert_eq!(config.runner.token_count, 3);
    assert_eq!(config.runner.admin_service, "neo4j");

    let neo4j = config.services.get("neo4j").expect("neo4j service configured");
    assert!(!neo4j.enabled);
    assert_eq!(neo4j.port, 7687);

    assert_eq!(config.observability.log_format, LogFormat::Pretty);

    utils::clean_env_vars();
}

// =============================================================================
// Environment Overrides
// =============================================================================

#[test]
#[serial]
fn test_env_var_overrides_file_values() {
    utils::clean_env_vars();
    unsafe {
        env::set_var("AUTHFLOW__TARGET__BASE_URL", "http://backend:5000");
        env::set_var("AUTHFLOW__RUNNER__TOKEN_COUNT", "5");
        env::set_var("AUTHFLOW__SERVICES__NEO4J__ENABLED", "true");
    };

    let config = load().expect("configuration should load");

    assert_eq!(config.target.base_url, "http://backend:5000");
    assert_eq!(config.runner.token_count, 5);
    assert!(config.services["neo4j"].enabled);
    // untouched values keep their file defaults
    assert_eq!(config.target.auth_prefix, "/auth");

    utils::clean_env_vars();
}

#[test]
#[serial]
fn test_environment_file_layer() {
    utils::clean_env_vars();
    unsafe { env::set_var("APP_ENV", "ci") };

    let config = load().expect("ci configuration should load");

    assert_eq!(config.target.base_url, "http://backend:8080");
    assert!(config.runner.wait);
    assert_eq!(config.runner.wait_timeout, 120);
    assert_eq!(config.services["neo4j"].host, "neo4j");
    assert_eq!(config.services["neo4j"].port, 7687);
    assert_eq!(config.observability.log_format, LogFormat::Json);

    utils::clean_env_vars();
}

#[test]
#[serial]
fn test_env_var_wins_over_environment_file() {
    utils::clean_env_vars();
    unsafe {
        env::set_var("APP_ENV", "ci");
        env::set_var("AUTHFLOW__RUNNER__WAIT", "false");
    };

    let config = load().expect("configuration should load");
    assert!(!config.runner.wait);

    utils::clean_env_vars();
}

// =============================================================================
// Validation
// =============================================================================

#[test]
#[serial]
fn test_invalid_env_value_is_rejected() {
    utils::clean_env_vars();
    unsafe { env::set_var("AUTHFLOW__TARGET__TIMEOUT", "0") };

    let result = load();
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));

    utils::clean_env_vars();
}

#[test]
#[serial]
fn test_invalid_base_url_is_rejected() {
    utils::clean_env_vars();
    unsafe { env::set_var("AUTHFLOW__TARGET__BASE_URL", "backend:5000") };

    let result = load();
    assert!(matches!(result, Err(ConfigError::ValidationError(ref m)) if m.contains("base_url")));

    utils::clean_env_vars();
}

#[test]
fn test_with_defaults_matches_default_file() {
    let defaults = AppConfig::with_defaults();
    assert!(defaults.validate().is_ok());
    assert_eq!(defaults.target.base_url, "http://localhost:8080");
    assert_eq!(defaults.runner.wait_interval, 1000);
}

#[test]
fn test_environment_file_alone_deserializes() {
    let config: AppConfig = config::Config::builder()
        .add_source(config::File::with_name("config/ci"))
        .build()
        .expect("ci file should parse")
        .try_deserialize()
        .expect("ci file should deserialize without the default layer");

    assert!(config.validate().is_ok());
    assert_eq!(config.services["neo4j"].port, 7687);
    assert_eq!(config.credentials.username, "user@nomail.org");
}

#[test]
#[serial]
fn test_service_without_port_is_rejected_by_name() {
    utils::clean_env_vars();
    unsafe {
        env::set_var("AUTHFLOW__SERVICES__MONGO__HOST", "mongo");
    };

    let result = load();
    assert!(matches!(
        result,
        Err(ConfigError::ValidationError(ref m)) if m == "services.mongo.port must be > 0"
    ));

    utils::clean_env_vars();
}
