//! Turning pointer input into paced stamps.

mod controller;
mod pacer;

pub use controller::{PointerEvent, StampSink, StrokeController, StrokeOutcome, StrokeState};
pub use pacer::{can_stamp, StrokeTiming, DELAY_STEP_MS, MAX_DELAY_MS};
