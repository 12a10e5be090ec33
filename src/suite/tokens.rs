use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{Case, Completion, Context, TOKEN_ID, TOKENS_HEADER};
use crate::auth::{AuthHeader, do_login};
use crate::client::Client;
use crate::ensure;
use crate::error::CheckError;
use crate::helpers::get_content;
use crate::status::{BAD_NOTFOUND, BAD_UNAUTHORIZED, OK_BASIC, OK_NORESPONSE};

/// Id no token ever has
const INVALID_TOKEN_ID: &str = "0";

/// One entry of `{auth}/tokens`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Opaque; some servers use numbers, some strings
    pub id: Value,
    pub token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenRecord {
    /// The id as a path segment
    pub fn segment(&self) -> Result<String, CheckError> {
        id_segment(&self.id)
    }
}

fn id_segment(id: &Value) -> Result<String, CheckError> {
    let raw = match id {
        Value::String(id) => id.clone(),
        Value::Number(id) => id.to_string(),
        other => return Err(CheckError::assertion(format!("token id {} is not a scalar", other))),
    };
    ensure!(!raw.is_empty(), "token id is empty");
    Ok(urlencoding::encode(&raw).into_owned())
}

fn single(client: &Client, segment: &str) -> String {
    client.target().auth(&format!("tokens/{}", segment))
}

/// Parse the token listing, requiring `id` and `token` on every entry
pub fn parse_tokens(content: Value) -> Result<Vec<TokenRecord>, CheckError> {
    let Value::Array(entries) = content else {
        return Err(CheckError::assertion(format!("token listing is not a list: {}", content)));
    };

    entries
        .into_iter()
        .map(|entry| -> Result<TokenRecord, CheckError> {
            ensure!(
                entry.get("id").is_some() && entry.get("token").is_some(),
                "token entry {} lacks id or token",
                entry
            );
            Ok(serde_json::from_value(entry)?)
        })
        .collect()
}

/// Pick a token other than `first`; the last such entry wins
pub fn pick_other(records: &[TokenRecord], first: &str) -> Option<TokenRecord> {
    records.iter().rev().find(|record| record.token != first).cloned()
}

/// Several logins produce several listed tokens
pub struct Tokens;

#[async_trait(?Send)]
impl Case for Tokens {
    fn name(&self) -> &'static str {
        "tokens"
    }

    async fn run(&self, ctx: &Context) -> Result<Completion, CheckError> {
        let client = &ctx.client;
        let num_tokens = ctx.config.runner.token_count;

        info!("*** CREATING {} TOKENS", num_tokens);
        let mut first_token = None;
        for i in 0..num_tokens {
            let (header, token) = do_login(client, &ctx.config.credentials, None, None, OK_BASIC)
                .await?
                .session()?;
            if i == 0 {
                ctx.store.save(TOKENS_HEADER, &header, true)?;
                first_token = Some(token);
            }
        }
        let first_token =
            first_token.ok_or_else(|| CheckError::assertion("no token was created"))?;
        let header: AuthHeader = ctx.store.get(TOKENS_HEADER)?;
        let endpoint = client.target().auth("tokens");

        info!("*** VERIFY listing all tokens");
        let r = client.get(endpoint).auth(Some(&header)).send().await?;
        r.expect(OK_BASIC)?;
        let records = parse_tokens(get_content(&r))?;
        ensure!(
            records.len() >= num_tokens,
            "expected at least {} tokens, got {}",
            num_tokens,
            records.len()
        );

        let other = pick_other(&records, &first_token)
            .ok_or_else(|| CheckError::assertion("every listed token is the first one"))?;
        debug!(token_id = %other.id, "picked token for single checks");
        ctx.store.save(TOKEN_ID, &other.id, false)?;

        info!("*** VERIFY getting a single token");
        client
            .get(single(client, &other.segment()?))
            .auth(Some(&header))
            .send()
            .await?
            .expect(OK_BASIC)?;

        info!("*** VERIFY getting an invalid token");
        client
            .get(single(client, INVALID_TOKEN_ID))
            .auth(Some(&header))
            .send()
            .await?
            .expect(BAD_NOTFOUND)?;

        Ok(Completion::Done)
    }
}

/// Tokens can be revoked one by one and all at once
pub struct DeleteTokens;

#[async_trait(?Send)]
impl Case for DeleteTokens {
    fn name(&self) -> &'static str {
        "delete_tokens"
    }

    async fn run(&self, ctx: &Context) -> Result<Completion, CheckError> {
        let client = &ctx.client;
        let header: AuthHeader = ctx.store.get(TOKENS_HEADER)?;
        let token_id: Value = ctx.store.get(TOKEN_ID)?;
        let endpoint = client.target().auth("tokens");
        let endpoint_single = single(client, &id_segment(&token_id)?);

        info!("*** VERIFY deleting a single token");
        client
            .delete(endpoint_single.clone())
            .auth(Some(&header))
            .send()
            .await?
            .expect(OK_NORESPONSE)?;

        info!("*** VERIFY deleting an already deleted token");
        client
            .delete(endpoint_single)
            .auth(Some(&header))
            .send()
            .await?
            .expect(BAD_UNAUTHORIZED)?;

        info!("*** VERIFY deleting an invalid token");
        client
            .delete(single(client, INVALID_TOKEN_ID))
            .auth(Some(&header))
            .send()
            .await?
            .expect(BAD_UNAUTHORIZED)?;

        info!("*** VERIFY deleting all tokens");
        client
            .delete(endpoint.clone())
            .auth(Some(&header))
            .send()
            .await?
            .expect(OK_NORESPONSE)?;

        info!("*** VERIFY the token used for deleting is now invalid");
        client
            .get(endpoint)
            .auth(Some(&header))
            .send()
            .await?
            .expect(BAD_UNAUTHORIZED)?;

        Ok(Completion::Done)
    }
}
