//! Drawing surface.
//!
//! A surface has a logical size (what the user asked for and what pointer
//! coordinates are expressed in) and a physical pixel store scaled by the
//! device pixel density. All drawing calls take logical coordinates; the
//! density is applied once when mapping them onto the pixel grid.
//!
//! Drawing state (global alpha, composite mode, shadow) works like an HTML
//! canvas context: it applies to every fill until changed, and can be saved
//! and restored as a stack.

use image::{Rgba, RgbaImage};
use palette::blend::{Blend, Compose};
use palette::Srgba;

use crate::types::Colour;

use super::raster::{
    blur_margin, blur_scale, in_ellipse, in_rect, in_round_rect, solid, Mask, PixelRect,
};

/// How source pixels combine with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Normal alpha compositing.
    #[default]
    SourceOver,
    /// Multiply blend, then source-over.
    Multiply,
}

/// Transient drawing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    pub global_alpha: f32,
    pub composite: CompositeMode,
    pub shadow_colour: Colour,
    /// Shadow blur in logical pixels. Shadows are drawn only when this is
    /// positive and the shadow colour is not transparent.
    pub shadow_blur: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            global_alpha: 1.0,
            composite: CompositeMode::SourceOver,
            shadow_colour: Colour::TRANSPARENT,
            shadow_blur: 0.0,
        }
    }
}

/// A raster drawing target with logical and physical sizes.
#[derive(Debug, Clone)]
pub struct Surface {
    logical_width: u32,
    logical_height: u32,
    density: f32,
    pixels: RgbaImage,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl Surface {
    /// Allocate a cleared surface.
    ///
    /// Sizes below one pixel are raised to one. The density is clamped to
    /// `[MIN_DENSITY, MAX_DENSITY]`; a non-positive or non-finite density is
    /// treated as 1.
    pub fn new(logical_width: u32, logical_height: u32, density: f32) -> Self {
        let density = clamp_density(density);
        let logical_width = logical_width.max(1);
        let logical_height = logical_height.max(1);
        Self {
            logical_width,
            logical_height,
            density,
            pixels: allocate(logical_width, logical_height, density),
            state: DrawState::default(),
            saved: Vec::new(),
        }
    }

    /// Change the logical size.
    ///
    /// The physical store is reallocated and all content is discarded, as is
    /// any drawing state.
    pub fn resize(&mut self, logical_width: u32, logical_height: u32) {
        *self = Self::new(logical_width, logical_height, self.density);
    }

    /// Change the pixel density, reallocating the physical store.
    pub fn set_density(&mut self, density: f32) {
        *self = Self::new(self.logical_width, self.logical_height, density);
    }

    /// Erase all pixels to transparent. Drawing state is kept.
    pub fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    pub fn logical_size(&self) -> (u32, u32) {
        (self.logical_width, self.logical_height)
    }

    pub fn physical_size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    /// The physical pixel store.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Physical pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Colour> {
        if x < self.pixels.width() && y < self.pixels.height() {
            Some(Colour::from(self.pixels.get_pixel(x, y).0))
        } else {
            None
        }
    }

    /// Check whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|p| p.0[3] == 0)
    }

    // -- Drawing state --

    pub fn state(&self) -> DrawState {
        self.state
    }

    /// Push the current drawing state.
    pub fn save(&mut self) {
        self.saved.push(self.state);
    }

    /// Pop the most recently saved drawing state. No-op when nothing is saved.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    pub fn set_global_alpha(&mut self, alpha: f32) {
        // Out-of-range values are ignored, like a canvas context.
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    pub fn set_composite(&mut self, mode: CompositeMode) {
        self.state.composite = mode;
    }

    pub fn set_shadow(&mut self, colour: Colour, blur: f32) {
        self.state.shadow_colour = colour;
        self.state.shadow_blur = if blur.is_finite() { blur.max(0.0) } else { 0.0 };
    }

    // -- Fills (logical coordinates) --

    /// Fill an axis-aligned ellipse centred at `(cx, cy)`.
    pub fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, colour: Colour) {
        let d = self.density;
        let (cx, cy, rx, ry) = (cx * d, cy * d, rx * d, ry * d);
        let bounds = PixelRect::enclosing(cx - rx, cy - ry, cx + rx, cy + ry);
        self.paint(
            bounds,
            |x, y| solid(in_ellipse(x, y, cx, cy, rx, ry)),
            |_, _| colour,
        );
    }

    /// Fill a rectangle with top-left corner `(x, y)`.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, colour: Colour) {
        let d = self.density;
        let (x, y, w, h) = (x * d, y * d, width * d, height * d);
        let bounds = PixelRect::enclosing(x, y, x + w, y + h);
        self.paint(bounds, |px, py| solid(in_rect(px, py, x, y, w, h)), |_, _| colour);
    }

    /// Fill a rounded rectangle with top-left corner `(x, y)`.
    pub fn fill_round_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        colour: Colour,
    ) {
        let d = self.density;
        let (x, y, w, h, r) = (x * d, y * d, width * d, height * d, radius * d);
        let bounds = PixelRect::enclosing(x, y, x + w, y + h);
        self.paint(
            bounds,
            |px, py| solid(in_round_rect(px, py, x, y, w, h, r)),
            |_, _| colour,
        );
    }

    /// Draw an image scaled into the rectangle with top-left corner `(x, y)`.
    ///
    /// Sampling is nearest-neighbour; the image alpha modulates coverage.
    pub fn draw_image(&mut self, image: &RgbaImage, x: f32, y: f32, width: f32, height: f32) {
        let (iw, ih) = image.dimensions();
        if iw == 0 || ih == 0 || width <= 0.0 || height <= 0.0 {
            return;
        }
        let d = self.density;
        let (x, y, w, h) = (x * d, y * d, width * d, height * d);
        let bounds = PixelRect::enclosing(x, y, x + w, y + h);

        let texel = |px: f32, py: f32| -> Rgba<u8> {
            let u = ((px - x) / w * iw as f32).floor();
            let v = ((py - y) / h * ih as f32).floor();
            let u = (u.max(0.0) as u32).min(iw - 1);
            let v = (v.max(0.0) as u32).min(ih - 1);
            *image.get_pixel(u, v)
        };

        self.paint(
            bounds,
            |px, py| {
                if in_rect(px, py, x, y, w, h) {
                    texel(px, py).0[3] as f32 / 255.0
                } else {
                    0.0
                }
            },
            |px, py| {
                let [r, g, b, _] = texel(px as f32 + 0.5, py as f32 + 0.5).0;
                Colour::rgb(r, g, b)
            },
        );
    }

    fn bounds(&self) -> PixelRect {
        let (width, height) = self.pixels.dimensions();
        PixelRect {
            x0: 0,
            y0: 0,
            x1: width as i32,
            y1: height as i32,
        }
    }

    fn shadow_active(&self) -> bool {
        self.state.shadow_blur > 0.0 && !self.state.shadow_colour.is_transparent()
    }

    /// Standard deviation of the shadow blur in physical pixels.
    fn shadow_sigma(&self) -> f32 {
        self.state.shadow_blur * self.density / 2.0
    }

    /// Composite a shape given by its pixel bounds and coverage weight:
    /// shadow first, then the shape itself.
    ///
    /// Only the part of the shape that can reach the surface is rasterised,
    /// and only surface pixels are visited.
    fn paint(
        &mut self,
        bounds: PixelRect,
        weight: impl Fn(f32, f32) -> f32,
        colour_at: impl Fn(i32, i32) -> Colour,
    ) {
        let alpha = self.state.global_alpha;
        let mode = self.state.composite;
        let surface = self.bounds();

        if self.shadow_active() {
            let sigma = self.shadow_sigma();
            let source = bounds.intersect(surface.expand(blur_margin(sigma)));
            if !source.is_empty() {
                let shadow = self.state.shadow_colour;
                let shadow_alpha = shadow.a as f32 / 255.0 * alpha;
                let glow = Mask::rasterize(source, blur_scale(sigma), &weight).blurred(sigma);
                let visible = glow.pixel_rect().intersect(surface);
                for y in visible.y0..visible.y1 {
                    for x in visible.x0..visible.x1 {
                        let coverage = glow.sample(x, y);
                        if coverage > 0.0 {
                            self.blend_pixel(x, y, shadow, coverage * shadow_alpha, mode);
                        }
                    }
                }
            }
        }

        let visible = bounds.intersect(surface);
        if visible.is_empty() {
            return;
        }
        let mask = Mask::rasterize(visible, 1, &weight);
        for (x, y, coverage) in mask.covered() {
            let colour = colour_at(x, y);
            let a = coverage * alpha * colour.a as f32 / 255.0;
            self.blend_pixel(x, y, colour, a, mode);
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, colour: Colour, alpha: f32, mode: CompositeMode) {
        if alpha <= 0.0 || x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.pixels.width() || y >= self.pixels.height() {
            return;
        }

        let dst = self.pixels.get_pixel_mut(x, y);
        let below = to_srgba(Colour::from(dst.0), 1.0);
        let above = to_srgba(colour, alpha.min(1.0));
        let out = match mode {
            CompositeMode::SourceOver => above.over(below),
            CompositeMode::Multiply => above.multiply(below),
        };
        *dst = Rgba(from_srgba(out));
    }
}

/// Lowest accepted pixel density.
pub const MIN_DENSITY: f32 = 0.5;
/// Highest accepted pixel density.
pub const MAX_DENSITY: f32 = 4.0;

/// Bring a pixel density into `[MIN_DENSITY, MAX_DENSITY]`. Non-positive
/// and non-finite values mean 1.
pub fn clamp_density(density: f32) -> f32 {
    if density.is_finite() && density > 0.0 {
        density.clamp(MIN_DENSITY, MAX_DENSITY)
    } else {
        1.0
    }
}

fn allocate(logical_width: u32, logical_height: u32, density: f32) -> RgbaImage {
    let width = ((logical_width as f32 * density).round() as u32).max(1);
    let height = ((logical_height as f32 * density).round() as u32).max(1);
    RgbaImage::new(width, height)
}

fn to_srgba(colour: Colour, alpha: f32) -> Srgba<f32> {
    Srgba::new(
        colour.r as f32 / 255.0,
        colour.g as f32 / 255.0,
        colour.b as f32 / 255.0,
        colour.a as f32 / 255.0 * alpha,
    )
}

fn from_srgba(colour: Srgba<f32>) -> [u8; 4] {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        channel(colour.red),
        channel(colour.green),
        channel(colour.blue),
        channel(colour.alpha),
    ]
}
