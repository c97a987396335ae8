//! Request descriptors handed to a [`Dispatcher`](super::Dispatcher).

use serde::Serialize;

/// The HTTP actions a dispatcher understands.
///
/// `Display` renders the namespaced action name (`http/GET`) used in logs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum HttpAction {
    #[strum(serialize = "http/GET")]
    Get,
    #[strum(serialize = "http/POST")]
    Post,
    #[strum(serialize = "http/PUT")]
    Put,
    #[strum(serialize = "http/PATCH")]
    Patch,
    #[strum(serialize = "http/DELETE")]
    Delete,
}

impl HttpAction {
    /// The HTTP method this action is sent with.
    pub fn method(self) -> reqwest::Method {
        match self {
            HttpAction::Get => reqwest::Method::GET,
            HttpAction::Post => reqwest::Method::POST,
            HttpAction::Put => reqwest::Method::PUT,
            HttpAction::Patch => reqwest::Method::PATCH,
            HttpAction::Delete => reqwest::Method::DELETE,
        }
    }

    /// Whether this action only reads server state.
    pub fn is_read(self) -> bool {
        matches!(self, HttpAction::Get)
    }
}

/// Payload of a dispatched request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    /// Resource path relative to the API root, e.g. `users/me`.
    pub url: String,
    /// Optional JSON body for write actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl Payload {
    /// A payload that addresses `path` and carries no body.
    pub fn url(path: impl Into<String>) -> Self {
        Self {
            url: path.into(),
            body: None,
        }
    }

    /// A payload that addresses `path` with a JSON body.
    pub fn with_body(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            url: path.into(),
            body: Some(body),
        }
    }
}
