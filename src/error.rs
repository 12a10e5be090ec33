use actix_web::http::{Method, StatusCode};
use thiserror::Error;

/// Failure of a single verification step
#[derive(Debug, Error)]
pub enum CheckError {
    /// The server answered with a status other than the expected one
    #[error("{method} {path}: expected status {expected}, got {actual}")]
    UnexpectedStatus {
        method: Method,
        path: String,
        expected: StatusCode,
        actual: StatusCode,
    },

    /// A payload or header assertion did not hold
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// A case needs a value an earlier case should have saved
    #[error("no value saved under '{0}'")]
    MissingState(String),

    /// Attempt to overwrite a read-only store entry
    #[error("'{0}' is read-only and cannot be overwritten")]
    ReadOnly(String),

    /// The request never produced a response
    #[error("{method} {path}: {message}")]
    Transport {
        method: Method,
        path: String,
        message: String,
    },

    /// A body or stored value could not be (de)serialized
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Waiting for a server or service gave up
    #[error("timed out waiting for {0}")]
    Timeout(String),
}

impl CheckError {
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion(message.into())
    }
}

/// Return early with [`CheckError::Assertion`] unless the condition holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::CheckError::Assertion(format!($($arg)+)));
        }
    };
}
