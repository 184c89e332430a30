//! Compose restart policy lookup.

use crate::job::{RestartMode, RestartPolicy};

/// Maps a Compose `restart` value onto a Nomad restart block.
///
/// Returns `None` for empty or unrecognized values.
#[must_use]
pub fn restart_policy(restart: &str) -> Option<RestartPolicy> {
    match restart.trim() {
        "always" | "unless-stopped" => Some(RestartPolicy {
            attempts: 0,
            delay: Some("15s"),
            interval: None,
            mode: RestartMode::Delay,
        }),
        "on-failure" => Some(RestartPolicy {
            attempts: 3,
            delay: None,
            interval: Some("1m"),
            mode: RestartMode::Fail,
        }),
        "no" => Some(RestartPolicy {
            attempts: 0,
            delay: None,
            interval: None,
            mode: RestartMode::Fail,
        }),
        _ => None,
    }
}
