use actix_web::http::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::auth::AuthHeader;
use crate::client::{Client, Response};
use crate::ensure;
use crate::error::CheckError;
use crate::status::OK_BASIC;

/// Key of the envelope the server wraps content in
const ENVELOPE: &str = "Response";

/// Content of a response.
///
/// `{"Response": {"data": ..}}` is unwrapped to its data, any other JSON is
/// returned as is, and a non-JSON body becomes a JSON string.
pub fn get_content(response: &Response) -> Value {
    match serde_json::from_slice::<Value>(&response.body) {
        Ok(Value::Object(mut fields)) if fields.contains_key(ENVELOPE) => {
            match fields.remove(ENVELOPE) {
                Some(Value::Object(mut envelope)) => envelope.remove("data").unwrap_or(Value::Null),
                Some(other) => other,
                None => Value::Null,
            }
        }
        Ok(value) => value,
        Err(_) => Value::String(response.text()),
    }
}

/// Fetch the Swagger document from the configured specs path
pub async fn get_specs(client: &Client) -> Result<Value, CheckError> {
    let path = client.target().specs_path.clone();
    let response = client.get(path).send().await?;
    response.expect(OK_BASIC)?;

    let specs = get_content(&response);
    ensure!(specs.is_object(), "specs document is not an object: {}", specs);

    Ok(specs)
}

/// Assert the content is a list whose elements carry the given fields and relationships.
///
/// A field may sit at the top level of an element or under its `attributes`;
/// relationships sit under `relationships`.
pub fn check_response(
    response: &Response,
    fields: &[&str],
    relationships: &[&str],
) -> Result<Vec<Value>, CheckError> {
    let content = get_content(response);
    let Value::Array(elements) = content else {
        return Err(CheckError::assertion(format!(
            "{} {}: content is not a list",
            response.method, response.path
        )));
    };

    for element in &elements {
        for field in fields {
            let found = element.get(field).is_some()
                || element.get("attributes").and_then(|a| a.get(field)).is_some();
            ensure!(found, "element {} lacks field '{}'", element, field);
        }
        for relationship in relationships {
            let found = element
                .get("relationships")
                .and_then(|r| r.get(relationship))
                .is_some();
            ensure!(found, "element {} lacks relationship '{}'", element, relationship);
        }
    }

    Ok(elements)
}

/// Statuses expected from each method in [`test_endpoint`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointStatuses {
    pub get: StatusCode,
    pub post: StatusCode,
    pub put: StatusCode,
    pub delete: StatusCode,
}

/// Responses collected by [`test_endpoint`], in method order
#[derive(Debug, Clone)]
pub struct EndpointResponses {
    pub get: Response,
    pub post: Response,
    pub put: Response,
    pub delete: Response,
}

/// Probe `{api}/{endpoint}` with GET, POST, PUT and DELETE, asserting each status
#[tracing::instrument(skip(client, header))]
pub async fn test_endpoint(
    client: &Client,
    endpoint: &str,
    header: Option<&AuthHeader>,
    expected: EndpointStatuses,
) -> Result<EndpointResponses, CheckError> {
    let path = client.target().api(endpoint);

    let get = client.get(path.clone()).auth(header).send().await?;
    get.expect(expected.get)?;
    debug!("GET {} -> {}", path, get.status);

    let post = client.post(path.clone()).auth(header).send().await?;
    post.expect(expected.post)?;
    debug!("POST {} -> {}", path, post.status);

    let put = client.put(path.clone()).auth(header).send().await?;
    put.expect(expected.put)?;
    debug!("PUT {} -> {}", path, put.status);

    let delete = client.delete(path.clone()).auth(header).send().await?;
    delete.expect(expected.delete)?;
    debug!("DELETE {} -> {}", path, delete.status);

    Ok(EndpointResponses {
        get,
        post,
        put,
        delete,
    })
}

/// Random alphanumeric string
pub fn random_string(len: usize) -> String {
    use rand::Rng;
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
