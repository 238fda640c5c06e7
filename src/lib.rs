//! Crosslight — randomized traffic-light phase controller
//!
//! This library models a traffic light whose phase (red/green) toggles on a
//! randomized timer, and exposes a blocking "wait until green" primitive to
//! concurrent callers. It is built from two pieces:
//!
//! - [`Mailbox`] — a capacity-1 handoff slot: a new send overwrites any
//!   unconsumed value, a receive suspends until a value is available.
//! - [`PhaseController`] — owns the mailbox and the current phase; its
//!   background loop toggles the phase at randomized intervals and publishes
//!   every transition into the mailbox.

pub mod error;
pub mod mailbox;
pub mod signal;

pub use error::SignalError;
pub use mailbox::Mailbox;
pub use signal::{Phase, PhaseController};
