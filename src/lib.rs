//! Contract suite for the authentication subsystem of a REST API server.
//!
//! The suite drives a running server through [`client::Client`] and walks the
//! ordered cases in [`suite`], passing auth headers and token ids forward
//! through the scratch [`store::Store`].

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod helpers;
pub mod metrics;
pub mod observability;
pub mod services;
pub mod status;
pub mod store;
pub mod suite;

// Re-export commonly used types for convenience
pub use auth::{AuthHeader, Credentials};
pub use client::{Client, Response};
pub use config::AppConfig;
pub use error::CheckError;
pub use services::Detector;
pub use store::Store;
pub use suite::{CaseReport, Context, Outcome, Suite, SuiteReport};
