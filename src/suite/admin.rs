use async_trait::async_trait;
use tracing::{debug, info};

use super::{Case, Completion, Context};
use crate::auth::do_login;
use crate::error::CheckError;
use crate::helpers::{EndpointStatuses, check_response, test_endpoint};
use crate::status::{BAD_METHOD_NOT_ALLOWED, BAD_REQUEST, OK_BASIC, OK_NORESPONSE};

const ENDPOINT: &str = "admin/users";

/// Statuses of the admin users collection: list only, creation needs a body
pub const ADMIN_USERS_STATUSES: EndpointStatuses = EndpointStatuses {
    get: OK_BASIC,
    post: BAD_REQUEST,
    put: BAD_METHOD_NOT_ALLOWED,
    delete: BAD_METHOD_NOT_ALLOWED,
};

/// Smoke check of the admin users endpoint, when its backend is deployed
pub struct AdminUsers;

#[async_trait(?Send)]
impl Case for AdminUsers {
    fn name(&self) -> &'static str {
        "admin_users"
    }

    async fn run(&self, ctx: &Context) -> Result<Completion, CheckError> {
        let service = ctx.config.runner.admin_service.as_str();
        if !ctx.detector.check_availability(service) {
            return Ok(Completion::Skipped(format!("service {} is not available", service)));
        }
        debug!("Testing admin users for {}", service);

        let client = &ctx.client;
        let (header, _) = do_login(client, &ctx.config.credentials, None, None, OK_BASIC)
            .await?
            .session()?;

        info!("*** VERIFY admin users endpoint");
        let responses = test_endpoint(client, ENDPOINT, Some(&header), ADMIN_USERS_STATUSES).await?;
        check_response(&responses.get, &[], &[])?;

        info!("*** VERIFY logout after admin checks");
        client
            .get(client.target().auth("logout"))
            .auth(Some(&header))
            .send()
            .await?
            .expect(OK_NORESPONSE)?;

        Ok(Completion::Done)
    }
}
