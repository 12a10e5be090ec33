use async_trait::async_trait;
use tracing::info;

use super::{AUTH_HEADER, Case, Completion, Context};
use crate::auth::do_login;
use crate::error::CheckError;
use crate::status::{BAD_UNAUTHORIZED, OK_BASIC};

const RANDOM_USER: &str = "ABC-Random-User-XYZ";
const RANDOM_PASSWORD: &str = "ABC-Random-Pass-XYZ";

/// Login answers with a token, and only for the right credentials
pub struct Login;

#[async_trait(?Send)]
impl Case for Login {
    fn name(&self) -> &'static str {
        "login"
    }

    async fn run(&self, ctx: &Context) -> Result<Completion, CheckError> {
        let client = &ctx.client;
        let defaults = &ctx.config.credentials;
        let user = defaults.username.as_str();
        let password = defaults.password.as_str();

        info!("*** VERIFY CASE INSENSITIVE LOGIN");
        do_login(client, defaults, Some(&user.to_uppercase()), Some(password), OK_BASIC).await?;

        // the password is the one part that must match exactly
        do_login(
            client,
            defaults,
            Some(user),
            Some(&password.to_uppercase()),
            BAD_UNAUTHORIZED,
        )
        .await?;

        info!("*** VERIFY valid credentials");
        let (header, _) = do_login(client, defaults, None, None, OK_BASIC)
            .await?
            .session()?;
        ctx.store.save(AUTH_HEADER, &header, false)?;

        info!("*** VERIFY invalid credentials");
        do_login(
            client,
            defaults,
            Some(RANDOM_USER),
            Some(RANDOM_PASSWORD),
            BAD_UNAUTHORIZED,
        )
        .await?;

        // a username that is not an email once crashed the auth backend
        info!("*** VERIFY with a non-email-username");
        do_login(
            client,
            defaults,
            Some("notanemail"),
            Some("[A-Za-z0-9]+"),
            BAD_UNAUTHORIZED,
        )
        .await?;

        Ok(Completion::Done)
    }
}
