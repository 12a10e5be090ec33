//! # Command Line Interface
//!
//! `run` drives the suite, `verify` waits for backing services and `wait`
//! waits for the server itself.

use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::{self, AppConfig, Validate};
use crate::observability;
use crate::services::{self, Detector};
use crate::suite::{Context, Suite};

#[derive(Debug, Parser)]
#[command(name = "authflow")]
#[command(about = "Authentication flow checks against a running REST API server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the server under test
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the authentication flow
    Run {
        /// Wait for the server to report alive first
        #[arg(long)]
        wait: bool,

        /// Run only these cases (suite order is kept)
        #[arg(long = "case")]
        cases: Vec<String>,
    },

    /// Wait for backing services to accept connections
    Verify {
        #[arg(short, long = "service", default_value = "neo4j")]
        services: Vec<String>,
    },

    /// Wait for the server to report alive
    Wait,
}

impl Cli {
    /// Fold command line overrides into the loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(base_url) = &self.base_url {
            config.target.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.target.timeout = timeout;
        }
        if let Commands::Run { wait: true, .. } = self.command {
            config.runner.wait = true;
        }
    }
}

/// Parse arguments, load configuration and execute the command
pub async fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = config::load().context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("Invalid command line overrides")?;
    observability::init(&config.observability, cli.verbose);

    match cli.command {
        Commands::Run { cases, .. } => run_suite(config, &cases).await,
        Commands::Verify { services: names } => {
            let detector = Detector::new(config.services.clone());
            services::verify(&detector, &names, &config.runner).await?;
            info!("Completed successfully");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Wait => {
            let ctx = Context::new(config);
            services::wait_server(&ctx.client, &ctx.config.runner).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_suite(config: AppConfig, cases: &[String]) -> anyhow::Result<ExitCode> {
    let mut suite = Suite::auth_flow();
    if !cases.is_empty() {
        suite = suite.only(cases)?;
    }

    let ctx = Context::new(config);
    if ctx.config.runner.wait {
        services::wait_server(&ctx.client, &ctx.config.runner)
            .await
            .context("Server did not come up")?;
    }

    info!(base_url = %ctx.config.target.base_url, cases = ?suite.names(), "Starting authentication flow");
    let report = suite.run(&ctx).await;
    println!("{}", report);

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
