//! `reqwest`-backed [`Dispatcher`] for the fleet management REST API.
//!
//! Paths in a [`Payload`] are resolved against the configured API root.
//! Requests carry the configured token using the Django REST Framework
//! `Authorization: Token <key>` scheme, and JSON responses are returned as
//! [`serde_json::Value`].

pub mod error;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::constants::USER_AGENT;
use crate::dispatch::{Dispatcher, HttpAction, Payload};

pub use error::DispatchError;

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Dispatches requests to the API over HTTP.
#[derive(Clone)]
pub struct HttpDispatcher {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl fmt::Debug for HttpDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpDispatcher")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpDispatcher {
    /// Build a dispatcher from the `[api]` config section.
    pub fn new(config: &ApiConfig) -> Result<Self, DispatchError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DispatchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    /// The API root every path is resolved against. Always ends in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative resource path against the API root.
    ///
    /// Absolute paths, full URLs, backslashes and `..` segments are rejected,
    /// and the joined URL must stay under the API root on the same origin.
    pub fn resolve(&self, path: &str) -> Result<Url, DispatchError> {
        if path.starts_with('/') || path.contains('\\') || Url::parse(path).is_ok() {
            return Err(DispatchError::InvalidUrl(format!(
                "expected a path relative to the API root, got '{path}'"
            )));
        }
        if path.split(['/', '?', '#']).any(|segment| segment == "..") {
            return Err(DispatchError::InvalidUrl(format!(
                "path '{path}' escapes the API root"
            )));
        }
        let url = self
            .base_url
            .join(path)
            .map_err(|e| DispatchError::InvalidUrl(format!("{path}: {e}")))?;
        // Percent-encoded dot segments are only collapsed by the join itself
        if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path()) {
            return Err(DispatchError::InvalidUrl(format!(
                "path '{path}' escapes the API root"
            )));
        }
        Ok(url)
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    type Output = Value;
    type Error = DispatchError;

    async fn dispatch(&self, action: HttpAction, payload: Payload) -> Result<Value, DispatchError> {
        let url = self.resolve(&payload.url)?;
        let request_id = uuid::Uuid::new_v4().to_string();
        debug!(%action, %url, %request_id, "dispatching request");

        let mut request = self
            .client
            .request(action.method(), url.clone())
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, request_id.as_str());
        if let Some(ref token) = self.token {
            request = request.header(AUTHORIZATION, format!("Token {token}"));
        }
        if let Some(ref body) = payload.body {
            request = request.json(body);
        }

        let result = match request.send().await {
            Ok(response) => {
                let status = response.status();
                match response.text().await {
                    Ok(body) => interpret_response(url.as_str(), status, &body),
                    Err(e) => Err(DispatchError::from_reqwest(url.as_str(), e)),
                }
            }
            Err(e) => Err(DispatchError::from_reqwest(url.as_str(), e)),
        };

        match &result {
            Ok(_) => debug!(%action, %url, %request_id, "request succeeded"),
            Err(e) => warn!(%action, %url, %request_id, error = %e, "request failed"),
        }
        result
    }
}

/// Validate the configured API root and make sure it ends in `/`.
///
/// Without the trailing slash `Url::join` would replace the last path
/// segment instead of appending to it.
fn parse_base_url(raw: &str) -> Result<Url, DispatchError> {
    let mut normalised = raw.trim().to_string();
    if !normalised.ends_with('/') {
        normalised.push('/');
    }
    let url = Url::parse(&normalised)
        .map_err(|e| DispatchError::InvalidUrl(format!("{raw}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DispatchError::InvalidUrl(format!(
            "{raw}: unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(DispatchError::InvalidUrl(format!(
            "{raw}: API root must not carry a query or fragment"
        )));
    }
    Ok(url)
}

/// Turn a status code and body into the dispatch result.
fn interpret_response(url: &str, status: StatusCode, body: &str) -> Result<Value, DispatchError> {
    if status.is_success() {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(body).map_err(|e| DispatchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        });
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(DispatchError::Unauthenticated {
            status: status.as_u16(),
            detail: error_detail(status, body),
        }),
        StatusCode::NOT_FOUND => Err(DispatchError::NotFound {
            url: url.to_string(),
        }),
        _ => Err(DispatchError::status(status.as_u16(), body)),
    }
}

/// Pull the human-readable reason out of an error response.
///
/// DRF error bodies look like `{"detail": "..."}`; anything else falls back
/// to the raw body, then to the status reason.
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(detail)) = map.get("detail") {
            return detail.clone();
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request rejected")
            .to_string()
    } else {
        body.to_string()
    }
}
