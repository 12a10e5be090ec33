use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::{Case, Completion, Context};
use crate::ensure;
use crate::error::CheckError;
use crate::helpers::get_specs;
use crate::status::MIMETYPE_JSON;

/// Top-level keys every Swagger document must expose
pub const REQUIRED_KEYS: [&str; 12] = [
    "basePath",
    "consumes",
    "produces",
    "definitions",
    "host",
    "info",
    "schemes",
    "swagger",
    "tags",
    "security",
    "securityDefinitions",
    "paths",
];

const LOGIN_PATH: &str = "/auth/login";
const BEARER: &str = "Bearer";

/// The server exposes its Swagger specs
pub struct Specifications;

#[async_trait(?Send)]
impl Case for Specifications {
    fn name(&self) -> &'static str {
        "specifications"
    }

    async fn run(&self, ctx: &Context) -> Result<Completion, CheckError> {
        info!("*** VERIFY the API specifications");
        let specs = get_specs(&ctx.client).await?;
        verify_specs(&specs)?;

        Ok(Completion::Done)
    }
}

pub fn verify_specs(specs: &Value) -> Result<(), CheckError> {
    for key in REQUIRED_KEYS {
        ensure!(specs.get(key).is_some(), "specs lack '{}'", key);
    }

    for key in ["consumes", "produces"] {
        let listed = specs[key]
            .as_array()
            .is_some_and(|mimes| mimes.iter().any(|m| m == MIMETYPE_JSON));
        ensure!(listed, "specs '{}' does not include {}", key, MIMETYPE_JSON);
    }

    ensure!(
        specs["security"].get(0).is_some_and(names_bearer),
        "first security requirement does not use Bearer"
    );
    ensure!(
        specs["securityDefinitions"].get(BEARER).is_some(),
        "securityDefinitions lack Bearer"
    );

    let login = specs["paths"]
        .get(LOGIN_PATH)
        .ok_or_else(|| CheckError::assertion(format!("specs lack path {}", LOGIN_PATH)))?;
    ensure!(login.get("post").is_some(), "{} does not define post", LOGIN_PATH);
    for method in ["get", "put", "delete"] {
        ensure!(login.get(method).is_none(), "{} must not define {}", LOGIN_PATH, method);
    }

    Ok(())
}

/// A security requirement is either a scheme map or a plain list of scheme names
fn names_bearer(requirement: &Value) -> bool {
    match requirement {
        Value::Object(schemes) => schemes.contains_key(BEARER),
        Value::Array(schemes) => schemes.iter().any(|scheme| scheme == BEARER),
        _ => false,
    }
}
