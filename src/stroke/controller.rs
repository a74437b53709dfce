//! Pointer stroke state machine.
//!
//! ```text
//!   Idle --down--> Stroking        stamp unconditionally
//!   Stroking --move--> Stroking    stamp if the pacer allows it
//!   Stroking --up/leave--> Idle    no stamp
//! ```
//!
//! Stamps land only where pointer samples land; nothing is interpolated
//! between two moves, so a fast pointer leaves gaps.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::pacer::StrokeTiming;

/// Receives the stamps a stroke produces.
pub trait StampSink {
    /// Render one stamp at logical position `(x, y)` and advance the palette.
    fn stamp(&mut self, x: f32, y: f32);
}

/// A pointer event over the surface, timestamped in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum PointerEvent {
    Down { x: f32, y: f32, t: u64 },
    Move { x: f32, y: f32, t: u64 },
    Up { t: u64 },
    Leave { t: u64 },
}

impl PointerEvent {
    /// Event timestamp in milliseconds.
    pub fn time(&self) -> u64 {
        match *self {
            PointerEvent::Down { t, .. }
            | PointerEvent::Move { t, .. }
            | PointerEvent::Up { t }
            | PointerEvent::Leave { t } => t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    Stroking,
}

/// What the controller did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeOutcome {
    /// A stamp was rendered.
    Stamped,
    /// A move came too soon after the previous stamp.
    Paced,
    /// The event does not apply in the current state.
    Ignored,
    /// The stroke finished.
    Ended,
}

/// Drives pointer events into stamps.
#[derive(Debug, Clone, Default)]
pub struct StrokeController {
    state: StrokeState,
    timing: StrokeTiming,
}

impl StrokeController {
    pub fn new(min_delay_ms: u64) -> Self {
        Self {
            state: StrokeState::Idle,
            timing: StrokeTiming::new(min_delay_ms),
        }
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn timing(&self) -> &StrokeTiming {
        &self.timing
    }

    /// Change the minimum delay between stamps.
    pub fn set_min_delay(&mut self, ms: u64) {
        self.timing.set_min_delay(ms);
    }

    /// Apply one pointer event.
    pub fn handle(&mut self, event: PointerEvent, sink: &mut impl StampSink) -> StrokeOutcome {
        match (self.state, event) {
            // A down while already stroking restarts the stroke.
            (_, PointerEvent::Down { x, y, t }) => {
                self.state = StrokeState::Stroking;
                self.stamp(sink, x, y, t)
            }
            (StrokeState::Stroking, PointerEvent::Move { x, y, t }) => {
                if !self.timing.admit(t) {
                    debug!(t, last = ?self.timing.last_stamp(), "move too soon, skipping stamp");
                    return StrokeOutcome::Paced;
                }
                self.stamp(sink, x, y, t)
            }
            (StrokeState::Stroking, PointerEvent::Up { .. } | PointerEvent::Leave { .. }) => {
                self.state = StrokeState::Idle;
                StrokeOutcome::Ended
            }
            (StrokeState::Idle, _) => StrokeOutcome::Ignored,
        }
    }

    fn stamp(&mut self, sink: &mut impl StampSink, x: f32, y: f32, t: u64) -> StrokeOutcome {
        sink.stamp(x, y);
        self.timing.record(t);
        StrokeOutcome::Stamped
    }
}
