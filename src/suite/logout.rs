use async_trait::async_trait;
use tracing::info;

use super::{AUTH_HEADER, Case, Completion, Context};
use crate::auth::AuthHeader;
use crate::error::CheckError;
use crate::status::{BAD_UNAUTHORIZED, OK_NORESPONSE};

/// Logout works with a valid token only
pub struct Logout;

#[async_trait(?Send)]
impl Case for Logout {
    fn name(&self) -> &'static str {
        "logout"
    }

    async fn run(&self, ctx: &Context) -> Result<Completion, CheckError> {
        let client = &ctx.client;
        let endpoint = client.target().auth("logout");
        let header: AuthHeader = ctx.store.get(AUTH_HEADER)?;

        info!("*** VERIFY valid token");
        client
            .get(endpoint.clone())
            .auth(Some(&header))
            .send()
            .await?
            .expect(OK_NORESPONSE)?;

        info!("*** VERIFY invalid token");
        client.get(endpoint).send().await?.expect(BAD_UNAUTHORIZED)?;

        Ok(Completion::Done)
    }
}
