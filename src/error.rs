//! Error types for crosslight.
//!
//! The core operations never fail: `wait_for_green` blocks until a green
//! phase is published, `current_phase` always returns a snapshot, and
//! `simulate` spawns the loop unconditionally. Only the deadline-bounded
//! wait variants report errors.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by deadline-bounded waits on a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignalError {
    /// No green phase was observed within the allowed wait.
    #[error("no green phase observed within {limit:?}")]
    WaitTimeout {
        /// The wait limit that elapsed.
        limit: Duration,
    },

    /// The controller was shut down while the caller was waiting.
    #[error("controller stopped while waiting for green")]
    Stopped,
}
