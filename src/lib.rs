//! fleetctl — command-line client for the fleet management API (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod config;
pub mod constants;
pub mod dispatch;
pub mod env;
pub mod http;
pub mod output;
pub mod requester;

pub use dispatch::{Dispatcher, HttpAction, Payload};
pub use http::{DispatchError, HttpDispatcher};
pub use requester::UserProfileRequester;
