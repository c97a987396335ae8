//! Fetching the signed-in user's own profile.

use crate::dispatch::{DispatchFuture, Dispatcher, HttpAction, Payload};

/// Resource path of the current user's profile, relative to the API root.
pub const MYSELF_PATH: &str = "users/me";

/// Requests the authenticated user's profile through an injected dispatcher.
///
/// Callers don't need to know the resource path or how the request is sent.
/// The requester holds no state besides the dispatcher and never inspects
/// what comes back.
#[derive(Debug, Clone)]
pub struct UserProfileRequester<D> {
    dispatcher: D,
}

impl<D: Dispatcher> UserProfileRequester<D> {
    pub fn new(dispatcher: D) -> Self {
        Self { dispatcher }
    }

    /// The dispatcher requests are sent through.
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Request the current user's profile.
    ///
    /// Issues one `GET users/me` and returns the dispatcher's pending result
    /// as is: its output on success, its error on failure.
    pub fn get_myself(&self) -> DispatchFuture<'_, D::Output, D::Error> {
        self.dispatcher
            .dispatch(HttpAction::Get, Payload::url(MYSELF_PATH))
    }
}
