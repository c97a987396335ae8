//! CLI command definitions and argument parsing.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use fleetctl::DispatchError;

/// Hint printed under an error, for failures the user can fix themselves.
pub fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<DispatchError>())
        .find_map(|dispatch| match dispatch {
            DispatchError::Unauthenticated { .. } => {
                Some("Run `fleetctl login --token <TOKEN>` or set FLEETCTL_TOKEN.")
            }
            DispatchError::Transport { .. } | DispatchError::Timeout { .. } => {
                Some("Check that the API is reachable, or point FLEETCTL_API_URL at it.")
            }
            _ => None,
        })
}
