//! Drawing session.
//!
//! `Canvas` owns everything a drawing session mutates: the surface, the
//! brush settings, the palette, the image brush cache, the random source
//! and the stroke controller. Host controls call its setters; pointer input
//! goes through [`Canvas::pointer`]. Everything runs on the caller's thread
//! except image decoding, whose results are picked up on the next pointer
//! event or an explicit [`Canvas::poll_images`].

use std::path::Path;

use tracing::debug;

use crate::config::{clamp_surface, CanvasConfig};
use crate::error::Result;
use crate::image_brush::{accepts_mime, ImageBrushCache};
use crate::render::{write_png, BrushRenderer, Surface};
use crate::stroke::{PointerEvent, StampSink, StrokeController, StrokeOutcome, StrokeState, StrokeTiming};
use crate::types::{BrushConfig, BrushShape, Colour, Palette, RandomSource, XorShift32};

/// The parts of a session a stamp touches.
struct Studio {
    surface: Surface,
    brush: BrushConfig,
    palette: Palette,
    images: ImageBrushCache,
    rng: Box<dyn RandomSource>,
}

impl StampSink for Studio {
    fn stamp(&mut self, x: f32, y: f32) {
        let colour = self.palette.current();
        BrushRenderer::new(&self.brush)
            .with_images(&self.images)
            .render(&mut self.surface, x, y, colour, self.rng.as_mut());
        self.palette.advance();
    }
}

/// An interactive drawing session.
pub struct Canvas {
    studio: Studio,
    controller: StrokeController,
}

impl Canvas {
    /// Create a session from configuration.
    ///
    /// The random source is seeded from `config.seed`, or from the clock
    /// when no seed is set.
    pub fn new(config: &CanvasConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => XorShift32::from_seed(seed),
            None => XorShift32::from_clock(),
        };
        Self::with_rng(config, Box::new(rng))
    }

    /// Create a session with a specific random source.
    pub fn with_rng(config: &CanvasConfig, rng: Box<dyn RandomSource>) -> Self {
        let config = config.clone().normalized();
        let surface = Surface::new(config.canvas.width, config.canvas.height, config.canvas.density);
        Self {
            studio: Studio {
                surface,
                brush: config.brush,
                palette: Palette::from_colours(config.palette),
                images: ImageBrushCache::new(),
                rng,
            },
            controller: StrokeController::new(config.stroke_delay_ms),
        }
    }

    /// Replace the image brush cache, e.g. to use a different decoder.
    pub fn with_image_cache(mut self, mut images: ImageBrushCache) -> Self {
        images.rebuild(self.studio.palette.colours());
        self.studio.images = images;
        self
    }

    // -- Pointer input --

    /// Feed one pointer event through the stroke controller.
    ///
    /// Finished image decodes are collected first so the stamp sees them.
    pub fn pointer(&mut self, event: PointerEvent) -> StrokeOutcome {
        self.studio.images.poll();
        self.controller.handle(event, &mut self.studio)
    }

    // -- Palette --

    /// Add a colour to the palette, rebuilding image tints if it was new.
    pub fn add_colour(&mut self, colour: Colour) -> bool {
        let added = self.studio.palette.add_colour(colour);
        if added {
            self.rebuild_images();
        }
        added
    }

    /// Remove a colour from the palette, rebuilding image tints if it was
    /// present.
    pub fn remove_colour(&mut self, colour: Colour) -> bool {
        let removed = self.studio.palette.remove_colour(colour);
        if removed {
            self.rebuild_images();
        }
        removed
    }

    /// Make the colour at `index` current.
    pub fn select_colour(&mut self, index: usize) -> bool {
        self.studio.palette.select(index)
    }

    fn rebuild_images(&mut self) {
        let Studio { images, palette, .. } = &mut self.studio;
        images.rebuild(palette.colours());
    }

    // -- Brush --

    pub fn set_shape(&mut self, shape: BrushShape) {
        self.studio.brush.shape = shape;
    }

    pub fn set_brush_size(&mut self, width: f32, height: f32) {
        self.studio.brush.set_size(width, height);
    }

    pub fn set_colour_variation(&mut self, amount: f32) {
        self.studio.brush.set_colour_variation(amount);
    }

    pub fn set_glow(&mut self, glow: f32) {
        self.studio.brush.set_glow(glow);
    }

    pub fn set_stroke_delay(&mut self, ms: u64) {
        self.controller.set_min_delay(ms);
    }

    /// Use an uploaded file as the brush image.
    ///
    /// Only SVG uploads are accepted; anything else is ignored and `false`
    /// returned. Empty markup is ignored too. An accepted upload switches
    /// the brush to the image shape and starts decoding one tint per
    /// palette colour.
    pub fn upload_image(&mut self, mime: &str, svg: &str) -> bool {
        if !accepts_mime(mime) {
            debug!(mime, "ignoring brush upload of unsupported type");
            return false;
        }
        if svg.trim().is_empty() {
            debug!("ignoring empty brush upload");
            return false;
        }
        let Studio { images, palette, brush, .. } = &mut self.studio;
        images.load(svg, palette.colours());
        brush.shape = BrushShape::Image;
        true
    }

    /// Collect finished image decodes without blocking.
    pub fn poll_images(&mut self) -> usize {
        self.studio.images.poll()
    }

    /// Block until outstanding image decodes have finished.
    pub fn wait_for_images(&mut self) -> usize {
        self.studio.images.wait_pending()
    }

    // -- Surface --

    /// Change the logical surface size, clamped to `100..=2000`.
    ///
    /// The surface is reallocated and its content discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.studio.surface.resize(clamp_surface(width), clamp_surface(height));
    }

    /// Change the pixel density. The surface content is discarded.
    pub fn set_density(&mut self, density: f32) {
        self.studio.surface.set_density(density);
    }

    /// Erase the surface.
    pub fn clear(&mut self) {
        self.studio.surface.clear();
    }

    /// Write the surface to a PNG file.
    pub fn export_png(&self, path: &Path) -> Result<()> {
        write_png(&self.studio.surface, path)
    }

    // -- Accessors --

    pub fn surface(&self) -> &Surface {
        &self.studio.surface
    }

    pub fn brush(&self) -> &BrushConfig {
        &self.studio.brush
    }

    pub fn palette(&self) -> &Palette {
        &self.studio.palette
    }

    pub fn images(&self) -> &ImageBrushCache {
        &self.studio.images
    }

    pub fn stroke_state(&self) -> StrokeState {
        self.controller.state()
    }

    pub fn timing(&self) -> &StrokeTiming {
        self.controller.timing()
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("size", &self.studio.surface.logical_size())
            .field("brush", &self.studio.brush)
            .field("palette", &self.studio.palette)
            .field("images", &self.studio.images)
            .field("controller", &self.controller)
            .finish()
    }
}
