//! The ordered authentication flow.
//!
//! Cases run strictly in order on one thread; each reads what earlier cases
//! saved in the [`Store`]. A failing case does not stop the ones after it,
//! though those may then fail on missing state.

pub mod admin;
pub mod login;
pub mod logout;
pub mod profile;
pub mod specs;
pub mod status;
pub mod tokens;

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{Instrument, error, info, info_span, warn};

use crate::client::Client;
use crate::config::AppConfig;
use crate::error::CheckError;
use crate::metrics;
use crate::services::Detector;
use crate::store::Store;

/// Store key of the header saved by the login case
pub const AUTH_HEADER: &str = "auth_header";
/// Store key of the read-only header used by the token cases
pub const TOKENS_HEADER: &str = "tokens_header";
/// Store key of the token id picked for single-token checks
pub const TOKEN_ID: &str = "token_id";

/// Everything a case can touch
pub struct Context {
    pub client: Client,
    pub store: Store,
    pub config: AppConfig,
    pub detector: Detector,
}

impl Context {
    pub fn new(config: AppConfig) -> Self {
        Self {
            client: Client::new(config.target.clone()),
            store: Store::new(),
            detector: Detector::new(config.services.clone()),
            config,
        }
    }
}

/// How a case that did not fail ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Done,
    Skipped(String),
}

/// One ordered step of the suite
#[async_trait(?Send)]
pub trait Case {
    fn name(&self) -> &'static str;

    async fn run(&self, ctx: &Context) -> Result<Completion, CheckError>;
}

#[derive(Debug)]
pub enum Outcome {
    Passed,
    Skipped(String),
    Failed(CheckError),
}

impl Outcome {
    fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Skipped(_) => "skipped",
            Outcome::Failed(_) => "failed",
        }
    }
}

#[derive(Debug)]
pub struct CaseReport {
    pub name: &'static str,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

#[derive(Debug, Default)]
pub struct SuiteReport {
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Passed))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    /// No case failed
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn case(&self, name: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|report| report.name == name)
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.cases.iter().filter(|report| predicate(&report.outcome)).count()
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.cases {
            write!(
                f,
                "{:<16} {:<8} {:>8.3}s",
                report.name,
                report.outcome.label(),
                report.elapsed.as_secs_f64()
            )?;
            match &report.outcome {
                Outcome::Skipped(reason) => writeln!(f, "  ({})", reason)?,
                Outcome::Failed(err) => writeln!(f, "  {}", err)?,
                Outcome::Passed => writeln!(f)?,
            }
        }
        write!(
            f,
            "{} passed, {} skipped, {} failed",
            self.passed(),
            self.skipped(),
            self.failed()
        )
    }
}

pub struct Suite {
    cases: Vec<Box<dyn Case>>,
}

impl Suite {
    pub fn new(cases: Vec<Box<dyn Case>>) -> Self {
        Self { cases }
    }

    /// Status, specs, login, profile, logout, tokens, token deletion, admin users
    pub fn auth_flow() -> Self {
        Self::new(vec![
            Box::new(status::Status),
            Box::new(specs::Specifications),
            Box::new(login::Login),
            Box::new(profile::Profile),
            Box::new(logout::Logout),
            Box::new(tokens::Tokens),
            Box::new(tokens::DeleteTokens),
            Box::new(admin::AdminUsers),
        ])
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.cases.iter().map(|case| case.name()).collect()
    }

    /// Keep only the named cases, in suite order
    pub fn only(self, names: &[String]) -> Result<Self, CheckError> {
        let known = self.names();
        if let Some(unknown) = names.iter().find(|name| !known.contains(&name.as_str())) {
            return Err(CheckError::assertion(format!(
                "unknown case '{}', expected one of: {}",
                unknown,
                known.join(", ")
            )));
        }

        let cases = self
            .cases
            .into_iter()
            .filter(|case| names.iter().any(|name| name == case.name()))
            .collect();

        Ok(Self::new(cases))
    }

    pub async fn run(&self, ctx: &Context) -> SuiteReport {
        metrics::describe_metrics();
        let mut report = SuiteReport::default();

        for case in &self.cases {
            let name = case.name();
            let started = Instant::now();

            let result = case.run(ctx).instrument(info_span!("case", name)).await;
            let elapsed = started.elapsed();

            let outcome = match result {
                Ok(Completion::Done) => {
                    info!(case = name, "passed");
                    Outcome::Passed
                }
                Ok(Completion::Skipped(reason)) => {
                    warn!(case = name, reason = %reason, "skipped");
                    Outcome::Skipped(reason)
                }
                Err(err) => {
                    error!(case = name, error = %err, "failed");
                    Outcome::Failed(err)
                }
            };

            metrics::record_case(name, outcome.label(), elapsed);
            report.cases.push(CaseReport {
                name,
                outcome,
                elapsed,
            });
        }

        report
    }
}
