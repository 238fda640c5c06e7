//! Randomized cycle-length sampling.
//!
//! A light holds each phase for a randomized interval: a dwell drawn
//! uniformly from [4000 ms, 6000 ms), plus an extra hold of 0, 1, or 2
//! whole seconds, chosen independently. The two draws are summed into a
//! single sleep, so one timer wakeup per cycle covers the whole interval
//! and the effective cycle length lands in [4 s, 8 s).

use std::time::Duration;

use rand::Rng;

/// Lower bound of the dwell window, inclusive.
pub const DWELL_MIN_MS: u64 = 4000;

/// Upper bound of the dwell window, exclusive.
pub const DWELL_MAX_MS: u64 = 6000;

/// Maximum extra hold beyond the dwell window, in whole seconds.
pub const EXTRA_HOLD_MAX_SECS: u64 = 2;

/// Upper bound on any sampled cycle length, exclusive.
pub const MAX_CYCLE: Duration = Duration::from_millis(DWELL_MAX_MS + EXTRA_HOLD_MAX_SECS * 1000);

/// Samples the length of one phase cycle.
pub fn sample_cycle<R: Rng>(rng: &mut R) -> Duration {
    let dwell_ms = rng.random_range(DWELL_MIN_MS..DWELL_MAX_MS);
    let extra_secs = rng.random_range(0..=EXTRA_HOLD_MAX_SECS);
    Duration::from_millis(dwell_ms) + Duration::from_secs(extra_secs)
}
