//! HTTP client fixture bound to the server under test.

use std::time::Duration;

use actix_web::http::header::{self, HeaderName};
use actix_web::http::{Method, StatusCode};
use actix_web::web::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::auth::AuthHeader;
use crate::config::TargetConfig;
use crate::error::CheckError;
use crate::metrics;

/// Largest body the fixture will buffer
const BODY_LIMIT: usize = 4 * 1024 * 1024;

/// Thin wrapper over [`awc::Client`] that resolves paths against the target
#[derive(Clone)]
pub struct Client {
    http: awc::Client,
    target: TargetConfig,
}

impl Client {
    pub fn new(target: TargetConfig) -> Self {
        let http = awc::Client::builder()
            .timeout(Duration::from_secs(target.timeout))
            .finish();

        Self { http, target }
    }

    pub fn target(&self) -> &TargetConfig {
        &self.target
    }

    pub fn get(&self, path: impl Into<String>) -> Call<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: impl Into<String>) -> Call<'_> {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: impl Into<String>) -> Call<'_> {
        self.request(Method::PUT, path)
    }

    pub fn delete(&self, path: impl Into<String>) -> Call<'_> {
        self.request(Method::DELETE, path)
    }

    pub fn request(&self, method: Method, path: impl Into<String>) -> Call<'_> {
        Call {
            client: self,
            method,
            path: path.into(),
            headers: Vec::new(),
            json: None,
        }
    }
}

/// A request being assembled; nothing is sent until [`Call::send`]
pub struct Call<'a> {
    client: &'a Client,
    method: Method,
    path: String,
    headers: Vec<(HeaderName, String)>,
    json: Option<Value>,
}

impl Call<'_> {
    pub fn header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Attach the bearer header, if any. `None` sends the request unauthenticated.
    pub fn auth(self, auth: Option<&AuthHeader>) -> Self {
        match auth {
            Some(auth) => self.header(header::AUTHORIZATION, auth.value.clone()),
            None => self,
        }
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, CheckError> {
        self.json = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub async fn send(self) -> Result<Response, CheckError> {
        let url = self.client.target.url(&self.path);
        debug!(method = %self.method, url = %url, "sending request");

        let mut request = self.client.http.request(self.method.clone(), &url);
        for (name, value) in self.headers {
            request = request.insert_header((name, value));
        }

        let sent = match &self.json {
            Some(body) => request.send_json(body).await,
            None => request.send().await,
        };

        let transport = |message: String| CheckError::Transport {
            method: self.method.clone(),
            path: self.path.clone(),
            message,
        };

        let mut response = sent.map_err(|e| transport(e.to_string()))?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .body()
            .limit(BODY_LIMIT)
            .await
            .map_err(|e| transport(e.to_string()))?;

        metrics::record_request(self.method.as_str(), status.as_u16());
        trace!(status = %status, bytes = body.len(), "received response");

        Ok(Response {
            method: self.method,
            path: self.path,
            status,
            content_type,
            body,
        })
    }
}

/// A fully buffered response
#[derive(Debug, Clone)]
pub struct Response {
    pub method: Method,
    pub path: String,
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Response {
    /// Fail with [`CheckError::UnexpectedStatus`] unless the status matches
    pub fn expect(&self, expected: StatusCode) -> Result<&Self, CheckError> {
        if self.status != expected {
            return Err(CheckError::UnexpectedStatus {
                method: self.method.clone(),
                path: self.path.clone(),
                expected,
                actual: self.status,
            });
        }
        Ok(self)
    }

    /// Body decoded as UTF-8, lossily
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Result<Value, CheckError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
