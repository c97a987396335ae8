//! Dispatcher trait: the seam between API helpers and the transport.
//!
//! Helpers such as [`UserProfileRequester`](crate::requester::UserProfileRequester)
//! describe a request with an [`HttpAction`] and a [`Payload`] and hand it to
//! whatever dispatcher they were built with. The dispatcher decides what the
//! result and the error look like.

pub mod action;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

pub use action::{HttpAction, Payload};

/// The pending result of a dispatch, exactly as a [`Dispatcher`] returns it.
pub type DispatchFuture<'a, O, E> = Pin<Box<dyn Future<Output = Result<O, E>> + Send + 'a>>;

/// Something that turns a request descriptor into a response.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// What a successful dispatch resolves to.
    type Output: Send;
    /// What a failed dispatch resolves to.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Perform `action` against `payload.url`.
    async fn dispatch(
        &self,
        action: HttpAction,
        payload: Payload,
    ) -> Result<Self::Output, Self::Error>;
}

#[async_trait]
impl<'a, D: Dispatcher + ?Sized> Dispatcher for &'a D {
    type Output = D::Output;
    type Error = D::Error;

    async fn dispatch(
        &self,
        action: HttpAction,
        payload: Payload,
    ) -> Result<Self::Output, Self::Error> {
        (**self).dispatch(action, payload).await
    }
}

#[async_trait]
impl<D: Dispatcher + ?Sized> Dispatcher for Arc<D> {
    type Output = D::Output;
    type Error = D::Error;

    async fn dispatch(
        &self,
        action: HttpAction,
        payload: Payload,
    ) -> Result<Self::Output, Self::Error> {
        (**self).dispatch(action, payload).await
    }
}

#[async_trait]
impl<D: Dispatcher + ?Sized> Dispatcher for Box<D> {
    type Output = D::Output;
    type Error = D::Error;

    async fn dispatch(
        &self,
        action: HttpAction,
        payload: Payload,
    ) -> Result<Self::Output, Self::Error> {
        (**self).dispatch(action, payload).await
    }
}
