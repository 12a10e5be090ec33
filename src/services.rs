//! Availability of the server under test and of its backing services.

use std::collections::HashMap;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::config::{RunnerConfig, ServiceConfig};
use crate::error::CheckError;
use crate::status::OK_BASIC;

/// Knows which backing services the server was deployed with
#[derive(Debug, Clone, Default)]
pub struct Detector {
    services: HashMap<String, ServiceConfig>,
}

impl Detector {
    pub fn new(services: HashMap<String, ServiceConfig>) -> Self {
        Self { services }
    }

    /// A service is available when it is configured and enabled
    pub fn check_availability(&self, name: &str) -> bool {
        self.services.get(name).is_some_and(|service| service.enabled)
    }

    pub fn get(&self, name: &str) -> Option<&ServiceConfig> {
        self.services.get(name)
    }
}

/// Retry a TCP connection to `host:port` until it succeeds or `limit` elapses
pub async fn wait_socket(
    host: &str,
    port: u16,
    name: &str,
    limit: Duration,
    interval: Duration,
) -> Result<(), CheckError> {
    let deadline = Instant::now() + limit;
    let address = format!("{}:{}", host, port);

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match timeout(remaining.max(interval), TcpStream::connect(&address)).await {
            Ok(Ok(_)) => {
                info!("Service {} is reachable at {}", name, address);
                return Ok(());
            }
            Ok(Err(e)) => debug!("Service {} not reachable yet: {}", name, e),
            Err(_) => debug!("Service {} connection attempt timed out", name),
        }

        if Instant::now() + interval > deadline {
            warn!("Giving up on service {} at {}", name, address);
            return Err(CheckError::Timeout(format!("{} at {}", name, address)));
        }
        sleep(interval).await;
    }
}

/// Wait for every named service; unknown names fail immediately
pub async fn verify(
    detector: &Detector,
    names: &[String],
    runner: &RunnerConfig,
) -> Result<(), CheckError> {
    for name in names {
        let service = detector
            .get(name)
            .ok_or_else(|| CheckError::assertion(format!("service \"{}\" was NOT detected", name)))?;

        info!("Verifying service: {}", name);
        wait_socket(
            &service.host,
            service.port,
            name,
            Duration::from_secs(runner.wait_timeout),
            Duration::from_millis(runner.wait_interval),
        )
        .await?;
    }

    Ok(())
}

/// Poll `{api}/status` until the server answers 200
pub async fn wait_server(client: &Client, runner: &RunnerConfig) -> Result<(), CheckError> {
    let deadline = Instant::now() + Duration::from_secs(runner.wait_timeout);
    let interval = Duration::from_millis(runner.wait_interval);
    let endpoint = client.target().api("status");

    loop {
        match client.get(endpoint.clone()).send().await {
            Ok(response) if response.status == OK_BASIC => {
                info!("Server is up");
                return Ok(());
            }
            Ok(response) => debug!("Server not ready yet: {}", response.status),
            Err(e) => debug!("Server not reachable yet: {}", e),
        }

        if Instant::now() + interval > deadline {
            return Err(CheckError::Timeout(format!("server at {}", client.target().base_url)));
        }
        sleep(interval).await;
    }
}
