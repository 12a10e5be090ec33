use actix_web::http::header;
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::{Case, Completion, Context};
use crate::ensure;
use crate::error::CheckError;
use crate::helpers::get_content;
use crate::status::{ALIVE_MESSAGE, BAD_NOTFOUND, MIMETYPE_HTML, OK_BASIC};

/// The server is running and reachable
pub struct Status;

#[async_trait(?Send)]
impl Case for Status {
    fn name(&self) -> &'static str {
        "status"
    }

    async fn run(&self, ctx: &Context) -> Result<Completion, CheckError> {
        let client = &ctx.client;
        let endpoint = client.target().api("status");

        info!("*** VERIFY if API is online");
        let r = client.get(endpoint.clone()).send().await?;
        r.expect(OK_BASIC)?;
        let output = get_content(&r);
        ensure!(
            output == Value::from(ALIVE_MESSAGE),
            "status content is {}, expected \"{}\"",
            output,
            ALIVE_MESSAGE
        );

        info!("*** VERIFY if invalid endpoint gives Not Found");
        let r = client.get(client.target().api("")).send().await?;
        r.expect(BAD_NOTFOUND)?;

        info!("*** VERIFY the alive message is rendered as HTML for browsers");
        let r = client
            .get(endpoint)
            .header(header::ACCEPT, MIMETYPE_HTML)
            .send()
            .await?;
        r.expect(OK_BASIC)?;
        verify_html(&r.text())?;

        Ok(Completion::Done)
    }
}

/// The HTML rendering wraps the alive message in a document
pub fn verify_html(output: &str) -> Result<(), CheckError> {
    ensure!(output != ALIVE_MESSAGE, "HTML status is the bare alive message");
    ensure!(output.contains(ALIVE_MESSAGE), "HTML status lacks the alive message");
    ensure!(output.contains("<html"), "HTML status lacks an <html> tag");
    ensure!(output.contains("<body>"), "HTML status lacks a <body> tag");
    Ok(())
}
