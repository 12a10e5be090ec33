//! Login helpers and the bearer header they produce.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::client::{Client, Response};
use crate::config::CredentialsConfig;
use crate::error::CheckError;
use crate::helpers::get_content;
use crate::status::OK_BASIC;

/// `Authorization: Bearer <token>` as saved between cases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthHeader {
    pub value: String,
}

impl AuthHeader {
    pub fn bearer(token: &str) -> Self {
        Self {
            value: format!("Bearer {}", token),
        }
    }

    pub fn token(&self) -> &str {
        self.value.strip_prefix("Bearer ").unwrap_or(&self.value)
    }
}

/// Username and password sent to the login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Fill the missing halves from the configured default account
    pub fn or_default(
        username: Option<&str>,
        password: Option<&str>,
        defaults: &CredentialsConfig,
    ) -> Self {
        Self::new(
            username.unwrap_or(&defaults.username),
            password.unwrap_or(&defaults.password),
        )
    }
}

/// Outcome of [`do_login`]: the response plus, on success, the issued token
#[derive(Debug, Clone)]
pub struct Login {
    pub response: Response,
    pub header: Option<AuthHeader>,
    pub token: Option<String>,
}

impl Login {
    /// Header and token of a successful login
    pub fn session(&self) -> Result<(AuthHeader, String), CheckError> {
        match (&self.header, &self.token) {
            (Some(header), Some(token)) => Ok((header.clone(), token.clone())),
            _ => Err(CheckError::assertion("login did not issue a token")),
        }
    }
}

/// POST the credentials to `{auth}/login` and assert the expected status.
///
/// `None` for either half means the configured default account.
#[tracing::instrument(skip_all, fields(username = ?username, expected = %expected))]
pub async fn do_login(
    client: &Client,
    defaults: &CredentialsConfig,
    username: Option<&str>,
    password: Option<&str>,
    expected: actix_web::http::StatusCode,
) -> Result<Login, CheckError> {
    let credentials = Credentials::or_default(username, password, defaults);
    let endpoint = client.target().auth("login");

    let response = client.post(endpoint).json(&credentials)?.send().await?;
    response.expect(expected)?;

    if response.status != OK_BASIC {
        return Ok(Login {
            response,
            header: None,
            token: None,
        });
    }

    let token = extract_token(&get_content(&response))?;
    debug!("login issued a token");

    Ok(Login {
        header: Some(AuthHeader::bearer(&token)),
        token: Some(token),
        response,
    })
}

/// The login content is either the bare token or an object carrying it
fn extract_token(content: &Value) -> Result<String, CheckError> {
    let token = match content {
        Value::String(token) => Some(token.as_str()),
        Value::Object(fields) => fields.get("token").and_then(Value::as_str),
        _ => None,
    };

    match token {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(CheckError::assertion(format!(
            "login content carries no token: {}",
            content
        ))),
    }
}
