//! Status codes the suite asserts on, named after what the server means by them.

use actix_web::http::StatusCode;

pub const OK_BASIC: StatusCode = StatusCode::OK;
/// Success with an empty body
pub const OK_NORESPONSE: StatusCode = StatusCode::NO_CONTENT;
pub const BAD_REQUEST: StatusCode = StatusCode::BAD_REQUEST;
pub const BAD_UNAUTHORIZED: StatusCode = StatusCode::UNAUTHORIZED;
pub const BAD_NOTFOUND: StatusCode = StatusCode::NOT_FOUND;
pub const BAD_METHOD_NOT_ALLOWED: StatusCode = StatusCode::METHOD_NOT_ALLOWED;

pub const ALIVE_MESSAGE: &str = "Server is alive!";
pub const MIMETYPE_JSON: &str = "application/json";
pub const MIMETYPE_HTML: &str = "text/html";
