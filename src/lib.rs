//! glowbrush - Layered glow brush engine
//!
//! A library for stamping three-layer brushes with per-layer colour
//! variation, a glow halo and a cycling colour palette onto a raster
//! surface, driven by paced pointer strokes. Brushes can be discs,
//! rectangles, rounded rectangles or an uploaded SVG tinted per colour.

pub mod canvas;
pub mod cli;
pub mod config;
pub mod error;
pub mod image_brush;
pub mod output;
pub mod render;
pub mod script;
pub mod stroke;
pub mod types;

pub use canvas::Canvas;
pub use config::{CanvasConfig, SurfaceConfig, CONFIG_FILENAME};
pub use error::{GlowError, Result};
pub use image_brush::{Decoder, ImageBrushCache, SvgDecoder};
pub use render::{write_png, BrushRenderer, FrameRecorder, Surface, TintedImages};
pub use script::{replay, HostAction, ReplayOptions, ReplaySummary, Script, Step};
pub use stroke::{can_stamp, PointerEvent, StampSink, StrokeController, StrokeOutcome, StrokeState, StrokeTiming};
pub use types::{vary_colour, BrushConfig, BrushShape, Colour, Palette, RandomSource, XorShift32};
