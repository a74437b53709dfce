//! Rendering module for glowbrush.
//!
//! This module owns the drawing surface, rasterises brush stamps onto it
//! and writes the result out as PNG or as a recorded GIF animation.

mod brush;
mod png;
mod raster;
mod record;
mod surface;

pub use brush::{BrushRenderer, NoImages, TintedImages};
pub use png::write_png;
pub use record::{FrameRecorder, MAX_FPS, MAX_HOLD_MS};
pub use surface::{clamp_density, CompositeMode, DrawState, Surface, MAX_DENSITY, MIN_DENSITY};
