//! Phase controller orchestration.
//!
//! The [`PhaseController`] owns the signal state and the mailbox, runs the
//! background loop that toggles the phase on a randomized timer, and exposes
//! the wait-for-green primitive to concurrent callers.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::SignalError;
use crate::mailbox::Mailbox;

use super::phase::Phase;
use super::state::SignalState;
use super::timing;

/// Controller for one traffic light.
///
/// Created in [`Phase::Red`] with the background loop not yet running. Once
/// [`simulate`](Self::simulate) is called, the loop toggles the phase at
/// randomized intervals (see [`timing`]) for the controller's lifetime,
/// publishing every transition into the owned [`Mailbox`]. Any number of
/// tasks may call [`wait_for_green`](Self::wait_for_green) or
/// [`current_phase`](Self::current_phase) concurrently with the loop.
pub struct PhaseController {
    /// Shared phase cell and transition counter.
    state: SignalState,
    /// Sole producer: the background loop. Consumers: wait-for-green callers.
    mailbox: Mailbox<Phase>,
    /// Stops the background loop.
    cancel: CancellationToken,
    /// Fixed RNG seed for deterministic cycles; entropy-seeded when `None`.
    seed: Option<u64>,
}

impl PhaseController {
    /// Creates a controller in red with entropy-seeded cycle lengths.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SignalState::new(),
            mailbox: Mailbox::new(),
            cancel: CancellationToken::new(),
            seed: None,
        }
    }

    /// Creates a controller whose cycle lengths derive from `seed`.
    ///
    /// Two controllers built from the same seed produce identical cycle
    /// sequences, which keeps timing tests deterministic.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new()
        }
    }

    /// Starts the background cycle loop and returns its handle.
    ///
    /// Returns immediately; the loop runs until [`shutdown`](Self::shutdown).
    /// Each cycle it sleeps for a freshly sampled interval, toggles the
    /// phase, and publishes the new phase into the mailbox.
    ///
    /// Call at most once. A second call would spawn a competing producer;
    /// the behavior of repeated calls is unspecified.
    pub fn simulate(self: &Arc<Self>) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let mut rng = controller
                .seed
                .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
            debug!("cycle loop started");
            loop {
                let cycle = timing::sample_cycle(&mut rng);
                tokio::select! {
                    () = controller.cancel.cancelled() => {
                        debug!("cycle loop stopped");
                        break;
                    }
                    () = tokio::time::sleep(cycle) => {
                        let from = controller.state.current();
                        let to = from.toggle();
                        controller.state.set(to);
                        let transitions = controller.state.record_transition();
                        info!(%from, %to, ?cycle, transitions, "phase transition");
                        controller.mailbox.send(to);
                    }
                }
            }
        })
    }

    /// Blocks the calling task until the light turns green.
    ///
    /// Loops on the mailbox, discarding red notifications, and returns once
    /// a green one arrives. Never times out and never fails; if the
    /// background loop is not running, this waits forever.
    ///
    /// When several tasks wait concurrently, each published green is
    /// consumed by exactly one of them — a waiter may see two consecutive
    /// greens before another sees any. Every waiter still returns
    /// eventually, since the loop republishes green every other transition.
    pub async fn wait_for_green(&self) {
        loop {
            if self.mailbox.recv().await == Phase::Green {
                return;
            }
        }
    }

    /// Like [`wait_for_green`](Self::wait_for_green), but gives up after
    /// `limit` or when the controller is shut down.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::WaitTimeout`] if no green was observed within
    /// `limit`, or [`SignalError::Stopped`] if [`shutdown`](Self::shutdown)
    /// was called while waiting.
    pub async fn wait_for_green_timeout(&self, limit: Duration) -> Result<(), SignalError> {
        tokio::select! {
            () = self.cancel.cancelled() => Err(SignalError::Stopped),
            outcome = tokio::time::timeout(limit, self.wait_for_green()) => {
                outcome.map_err(|_| SignalError::WaitTimeout { limit })
            }
        }
    }

    /// Returns a snapshot of the current phase.
    ///
    /// Safe to call from any task concurrently with the background loop.
    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.state.current()
    }

    /// Returns the number of phase toggles since construction.
    #[must_use]
    pub fn transitions(&self) -> u64 {
        self.state.transitions()
    }

    /// Stops the background cycle loop. Idempotent.
    ///
    /// Pending [`wait_for_green_timeout`](Self::wait_for_green_timeout)
    /// calls fail with [`SignalError::Stopped`].
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Returns whether [`shutdown`](Self::shutdown) has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Default for PhaseController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PhaseController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseController")
            .field("current_phase", &self.current_phase())
            .field("transitions", &self.transitions())
            .field("stopped", &self.is_stopped())
            .finish_non_exhaustive()
    }
}
