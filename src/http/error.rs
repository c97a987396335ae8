//! Errors from the HTTP dispatcher.

use thiserror::Error;

/// Longest response body kept in a [`DispatchError::Status`] message.
const MAX_BODY_CHARS: usize = 512;

/// Errors that can occur while dispatching an API request over HTTP.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("not authenticated (HTTP {status}): {detail}")]
    Unauthenticated { status: u16, detail: String },

    #[error("resource not found: {url}")]
    NotFound { url: String },

    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl DispatchError {
    /// Whether the server rejected the request's credentials.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, DispatchError::Unauthenticated { .. })
    }

    /// Map a `reqwest` send/read failure for `url`.
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DispatchError::Timeout {
                url: url.to_string(),
            }
        } else {
            DispatchError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// A [`DispatchError::Status`] with the body cut down to a readable length.
    pub(crate) fn status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let body = match body.char_indices().nth(MAX_BODY_CHARS) {
            Some((idx, _)) => format!("{}…", &body[..idx]),
            None if body.is_empty() => "<no body>".to_string(),
            None => body.to_string(),
        };
        DispatchError::Status { status, body }
    }
}
