//! Stroke pacing.
//!
//! A stroke may not stamp more often than the configured minimum delay. The
//! gate is a pure comparison of timestamps in milliseconds.

/// Largest supported inter-stamp delay, in milliseconds.
pub const MAX_DELAY_MS: u64 = 300;

/// Delay slider step, in milliseconds.
pub const DELAY_STEP_MS: u64 = 10;

/// Whether a stamp at `now` is allowed after one at `last`.
///
/// True iff at least `min_delay` milliseconds have passed. A zero delay
/// always permits; a clock running backwards never does otherwise.
pub fn can_stamp(now: u64, last: u64, min_delay: u64) -> bool {
    if min_delay == 0 {
        return true;
    }
    now.checked_sub(last)
        .is_some_and(|elapsed| elapsed >= min_delay)
}

/// Time of the last accepted stamp and the minimum gap between stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrokeTiming {
    last_stamp: Option<u64>,
    min_delay: u64,
}

impl StrokeTiming {
    pub fn new(min_delay: u64) -> Self {
        let mut timing = Self::default();
        timing.set_min_delay(min_delay);
        timing
    }

    /// Set the minimum delay, clamped to `0..=300` and snapped to 10 ms.
    pub fn set_min_delay(&mut self, ms: u64) {
        let ms = ms.min(MAX_DELAY_MS);
        self.min_delay = (ms + DELAY_STEP_MS / 2) / DELAY_STEP_MS * DELAY_STEP_MS;
    }

    pub fn min_delay(&self) -> u64 {
        self.min_delay
    }

    pub fn last_stamp(&self) -> Option<u64> {
        self.last_stamp
    }

    /// Whether a stamp at `now` may be rendered.
    pub fn admit(&self, now: u64) -> bool {
        match self.last_stamp {
            Some(last) => can_stamp(now, last, self.min_delay),
            None => true,
        }
    }

    /// Remember `now` as the time of the latest stamp.
    pub fn record(&mut self, now: u64) {
        self.last_stamp = Some(now);
    }
}
