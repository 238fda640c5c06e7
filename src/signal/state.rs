//! Shared signal state.
//!
//! Atomic state for the current phase and transition count. The phase cell
//! is written by the controller's background loop and read from any task, so
//! every access goes through an atomic; there is no unsynchronized path.

use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use super::phase::Phase;

/// Concurrently readable signal state.
///
/// Writes come from a single producer (the background loop); reads may come
/// from any number of tasks at once.
pub struct SignalState {
    /// Current phase, encoded via [`Phase::bits`].
    phase: AtomicU8,
    /// Number of phase toggles since construction.
    transitions: AtomicU64,
}

impl SignalState {
    /// Creates state for a freshly constructed light: red, zero transitions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(Phase::Red.bits()),
            transitions: AtomicU64::new(0),
        }
    }

    /// Returns a snapshot of the current phase.
    #[must_use]
    pub fn current(&self) -> Phase {
        Phase::from_bits(self.phase.load(Ordering::SeqCst))
    }

    /// Stores a new current phase.
    pub fn set(&self, phase: Phase) {
        self.phase.store(phase.bits(), Ordering::SeqCst);
    }

    /// Increments the transition counter, returning the new total.
    pub fn record_transition(&self) -> u64 {
        let prev = self.transitions.fetch_add(1, Ordering::SeqCst);
        prev.saturating_add(1)
    }

    /// Returns the number of phase toggles so far.
    #[must_use]
    pub fn transitions(&self) -> u64 {
        self.transitions.load(Ordering::SeqCst)
    }
}

impl Default for SignalState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SignalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalState")
            .field("current", &self.current())
            .field("transitions", &self.transitions())
            .finish_non_exhaustive()
    }
}
