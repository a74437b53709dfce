//! Coverage masks and the shape predicates used to fill them.
//!
//! Everything here works in physical pixels. A `Mask` is a rectangular
//! window of coverage values in `[0, 1]` positioned somewhere on the
//! surface grid, one per pixel or per block of pixels; shapes fill it by
//! 4x4 supersampling and the glow pass blurs it.

/// Samples per axis when estimating pixel coverage.
const SUPERSAMPLE: usize = 4;

/// Axis-aligned pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    /// Smallest pixel rectangle containing the float bounds.
    pub fn enclosing(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            x0: left.floor() as i32,
            y0: top.floor() as i32,
            x1: right.ceil() as i32,
            y1: bottom.ceil() as i32,
        }
    }

    /// Grow every side by `margin` pixels.
    pub fn expand(self, margin: i32) -> Self {
        Self {
            x0: self.x0 - margin,
            y0: self.y0 - margin,
            x1: self.x1 + margin,
            y1: self.y1 + margin,
        }
    }

    /// Intersection with another rectangle (possibly empty).
    pub fn intersect(self, other: PixelRect) -> Self {
        Self {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    pub fn width(&self) -> usize {
        (self.x1 - self.x0).max(0) as usize
    }

    pub fn height(&self) -> usize {
        (self.y1 - self.y0).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Largest blur, in mask cells, run at full resolution. Wider blurs are
/// computed on a coarser grid and interpolated back.
const MAX_CELL_SIGMA: f32 = 4.0;

/// Pixels a blur of `sigma` can reach beyond its source.
pub fn blur_margin(sigma: f32) -> i32 {
    (sigma * 3.0).ceil() as i32 + 2
}

/// Cell size, in pixels, used when blurring with `sigma`.
pub fn blur_scale(sigma: f32) -> i32 {
    ((sigma / MAX_CELL_SIGMA).floor() as i32).max(1)
}

/// Draw-time weight of a point-in-shape test.
pub fn solid(inside: bool) -> f32 {
    if inside {
        1.0
    } else {
        0.0
    }
}

/// Coverage over a window of the surface.
///
/// Each cell spans `scale` x `scale` physical pixels; at scale 1 a cell is
/// a pixel.
#[derive(Debug, Clone)]
pub struct Mask {
    /// Window in cell coordinates.
    rect: PixelRect,
    scale: i32,
    data: Vec<f32>,
}

impl Mask {
    fn zeroed(rect: PixelRect, scale: i32) -> Self {
        Self {
            rect,
            scale,
            data: vec![0.0; rect.width() * rect.height()],
        }
    }

    /// Estimate the coverage of `weight` over the pixels of `pixels`, one
    /// cell per `scale` pixels. `weight` is evaluated at sample points in
    /// physical pixel coordinates and returns a value in `[0, 1]`.
    pub fn rasterize(pixels: PixelRect, scale: i32, weight: impl Fn(f32, f32) -> f32) -> Self {
        let scale = scale.max(1);
        let rect = PixelRect {
            x0: pixels.x0.div_euclid(scale),
            y0: pixels.y0.div_euclid(scale),
            x1: -(-pixels.x1).div_euclid(scale),
            y1: -(-pixels.y1).div_euclid(scale),
        };
        let mut mask = Self::zeroed(rect, scale);
        let step = scale as f32 / SUPERSAMPLE as f32;
        let norm = 1.0 / (SUPERSAMPLE * SUPERSAMPLE) as f32;

        for row in 0..rect.height() {
            let py = ((rect.y0 + row as i32) * scale) as f32;
            for col in 0..rect.width() {
                let px = ((rect.x0 + col as i32) * scale) as f32;
                let mut total = 0.0;
                for sy in 0..SUPERSAMPLE {
                    let y = py + (sy as f32 + 0.5) * step;
                    for sx in 0..SUPERSAMPLE {
                        let x = px + (sx as f32 + 0.5) * step;
                        total += weight(x, y);
                    }
                }
                mask.data[row * rect.width() + col] = total * norm;
            }
        }
        mask
    }

    #[cfg(test)]
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    /// Pixels spanned by the mask.
    pub fn pixel_rect(&self) -> PixelRect {
        let s = self.scale;
        PixelRect {
            x0: self.rect.x0 * s,
            y0: self.rect.y0 * s,
            x1: self.rect.x1 * s,
            y1: self.rect.y1 * s,
        }
    }

    /// Coverage of the cell at `(x, y)`; zero outside the window.
    pub fn get(&self, x: i32, y: i32) -> f32 {
        let r = self.rect;
        if x < r.x0 || y < r.y0 || x >= r.x1 || y >= r.y1 {
            return 0.0;
        }
        self.data[(y - r.y0) as usize * r.width() + (x - r.x0) as usize]
    }

    /// Coverage at the centre of pixel `(x, y)`, interpolated between cells.
    pub fn sample(&self, x: i32, y: i32) -> f32 {
        if self.scale == 1 {
            return self.get(x, y);
        }
        let s = self.scale as f32;
        let u = (x as f32 + 0.5) / s - 0.5;
        let v = (y as f32 + 0.5) / s - 0.5;
        let (u0, v0) = (u.floor(), v.floor());
        let (fu, fv) = (u - u0, v - v0);
        let (cx, cy) = (u0 as i32, v0 as i32);

        let top = self.get(cx, cy) * (1.0 - fu) + self.get(cx + 1, cy) * fu;
        let bottom = self.get(cx, cy + 1) * (1.0 - fu) + self.get(cx + 1, cy + 1) * fu;
        top * (1.0 - fv) + bottom * fv
    }

    /// Non-zero cells as `(x, y, coverage)`.
    pub fn covered(&self) -> impl Iterator<Item = (i32, i32, f32)> + '_ {
        let width = self.rect.width().max(1);
        let (x0, y0) = (self.rect.x0, self.rect.y0);
        self.data
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v > 0.0)
            .map(move |(i, &v)| (x0 + (i % width) as i32, y0 + (i / width) as i32, v))
    }

    /// Sum of all coverage values.
    #[cfg(test)]
    pub fn total(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Gaussian blur of `sigma` physical pixels, approximated by three box
    /// blurs on the mask's own grid.
    ///
    /// The result covers a window grown by three standard deviations so
    /// nothing is cut off at the edges.
    pub fn blurred(&self, sigma: f32) -> Mask {
        if sigma <= 0.0 || self.rect.is_empty() {
            return self.clone();
        }
        let sigma = sigma / self.scale as f32;

        let rect = self.rect.expand(blur_margin(sigma));
        let mut out = Mask::zeroed(rect, self.scale);
        for (x, y, v) in self.covered() {
            let idx = (y - rect.y0) as usize * rect.width() + (x - rect.x0) as usize;
            out.data[idx] = v;
        }

        let (width, height) = (rect.width(), rect.height());
        let mut scratch = vec![0.0; out.data.len()];
        for size in box_sizes(sigma) {
            let radius = (size - 1) / 2;
            box_blur_rows(&out.data, &mut scratch, width, height, radius);
            box_blur_columns(&scratch, &mut out.data, width, height, radius);
        }
        out
    }
}

/// Box widths whose repeated application approximates a Gaussian.
fn box_sizes(sigma: f32) -> [usize; 3] {
    const PASSES: f32 = 3.0;
    let ideal = (12.0 * sigma * sigma / PASSES + 1.0).sqrt();
    let mut lower = ideal.floor() as i64;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;

    let l = lower as f32;
    let split = ((12.0 * sigma * sigma - PASSES * l * l - 4.0 * PASSES * l - 3.0 * PASSES)
        / (-4.0 * l - 4.0))
        .round() as i64;

    std::array::from_fn(|i| if (i as i64) < split { lower as usize } else { upper as usize })
}

fn box_blur_rows(src: &[f32], dst: &mut [f32], width: usize, height: usize, radius: usize) {
    let norm = 1.0 / (2 * radius + 1) as f32;
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        let out = &mut dst[y * width..(y + 1) * width];
        let mut sum: f32 = row.iter().take(radius + 1).sum();
        for x in 0..width {
            out[x] = sum * norm;
            if x + radius + 1 < width {
                sum += row[x + radius + 1];
            }
            if x >= radius {
                sum -= row[x - radius];
            }
        }
    }
}

fn box_blur_columns(src: &[f32], dst: &mut [f32], width: usize, height: usize, radius: usize) {
    let norm = 1.0 / (2 * radius + 1) as f32;
    for x in 0..width {
        let mut sum: f32 = (0..(radius + 1).min(height)).map(|y| src[y * width + x]).sum();
        for y in 0..height {
            dst[y * width + x] = sum * norm;
            if y + radius + 1 < height {
                sum += src[(y + radius + 1) * width + x];
            }
            if y >= radius {
                sum -= src[(y - radius) * width + x];
            }
        }
    }
}

/// Point-in-ellipse test.
pub fn in_ellipse(x: f32, y: f32, cx: f32, cy: f32, rx: f32, ry: f32) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let dx = (x - cx) / rx;
    let dy = (y - cy) / ry;
    dx * dx + dy * dy <= 1.0
}

/// Point-in-rectangle test for `[left, left + width) x [top, top + height)`.
pub fn in_rect(x: f32, y: f32, left: f32, top: f32, width: f32, height: f32) -> bool {
    x >= left && x < left + width && y >= top && y < top + height
}

/// Point-in-rounded-rectangle test. The radius is capped at half the
/// shorter side.
pub fn in_round_rect(
    x: f32,
    y: f32,
    left: f32,
    top: f32,
    width: f32,
    height: f32,
    radius: f32,
) -> bool {
    if !in_rect(x, y, left, top, width, height) {
        return false;
    }
    let radius = radius.clamp(0.0, width.min(height) / 2.0);
    let nx = x.clamp(left + radius, left + width - radius);
    let ny = y.clamp(top + radius, top + height - radius);
    let (dx, dy) = (x - nx, y - ny);
    dx * dx + dy * dy <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_coverage_is_exact_on_pixel_grid() {
        let rect = PixelRect::enclosing(2.0, 2.0, 6.0, 5.0);
        let mask = Mask::rasterize(rect, 1, |x, y| solid(in_rect(x, y, 2.0, 2.0, 4.0, 3.0)));
        assert_eq!(mask.get(2, 2), 1.0);
        assert_eq!(mask.get(5, 4), 1.0);
        assert_eq!(mask.get(6, 4), 0.0);
        assert!((mask.total() - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_half_pixel_edge_is_partial() {
        let rect = PixelRect::enclosing(0.0, 0.0, 2.0, 1.0);
        let mask = Mask::rasterize(rect, 1, |x, y| solid(in_rect(x, y, 0.5, 0.0, 1.0, 1.0)));
        assert!((mask.get(0, 0) - 0.5).abs() < 1e-6);
        assert!((mask.get(1, 0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ellipse_area_close_to_analytic() {
        let (cx, cy, rx, ry) = (20.0, 20.0, 12.0, 6.0);
        let rect = PixelRect::enclosing(cx - rx, cy - ry, cx + rx, cy + ry);
        let mask = Mask::rasterize(rect, 1, |x, y| solid(in_ellipse(x, y, cx, cy, rx, ry)));
        let expected = std::f32::consts::PI * rx * ry;
        assert!((mask.total() - expected).abs() / expected < 0.02);
    }

    #[test]
    fn test_round_rect_cuts_corners() {
        let inside = |x, y| in_round_rect(x, y, 0.0, 0.0, 12.0, 12.0, 4.0);
        assert!(!inside(0.2, 0.2));
        assert!(inside(6.0, 0.2));
        assert!(inside(6.0, 6.0));
        assert!(inside(4.0, 4.0));
    }

    #[test]
    fn test_blur_preserves_mass_and_spreads() {
        let rect = PixelRect::enclosing(10.0, 10.0, 14.0, 14.0);
        let mask = Mask::rasterize(rect, 1, |x, y| solid(in_rect(x, y, 10.0, 10.0, 4.0, 4.0)));
        let blurred = mask.blurred(2.0);

        assert!((blurred.total() - mask.total()).abs() < 0.05);
        assert!(blurred.get(12, 12) < 1.0);
        assert!(blurred.get(8, 12) > 0.0);
        assert!(blurred.rect().width() > rect.width());
    }

    #[test]
    fn test_zero_sigma_blur_is_identity() {
        let rect = PixelRect::enclosing(0.0, 0.0, 3.0, 3.0);
        let mask = Mask::rasterize(rect, 1, |x, y| solid(in_rect(x, y, 1.0, 1.0, 1.0, 1.0)));
        let same = mask.blurred(0.0);
        assert_eq!(same.rect(), mask.rect());
        assert_eq!(same.get(1, 1), 1.0);
    }

    #[test]
    fn test_coarse_blur_matches_full_resolution() {
        let rect = PixelRect::enclosing(40.0, 40.0, 80.0, 80.0);
        let shape = |x, y| solid(in_rect(x, y, 40.0, 40.0, 40.0, 40.0));
        let sigma = 16.0;

        let fine = Mask::rasterize(rect, 1, shape).blurred(sigma);
        let coarse = Mask::rasterize(rect, blur_scale(sigma), shape).blurred(sigma);
        assert_eq!(blur_scale(sigma), 4);

        for (x, y) in [(60, 60), (40, 60), (30, 30), (90, 60), (60, 20)] {
            let (a, b) = (fine.get(x, y), coarse.sample(x, y));
            assert!((a - b).abs() < 0.05, "at ({x}, {y}): {a} vs {b}");
        }
        assert!(coarse.pixel_rect().width() >= fine.rect().width());
    }

    #[test]
    fn test_coarse_mask_is_small() {
        let rect = PixelRect::enclosing(0.0, 0.0, 2000.0, 2000.0);
        let mask = Mask::rasterize(rect, blur_scale(1000.0), |_, _| 1.0);
        assert_eq!(mask.rect().width(), 8);
        assert_eq!(mask.pixel_rect(), rect);
        assert!((mask.sample(1000, 1000) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sample_at_full_resolution_is_exact() {
        let rect = PixelRect::enclosing(0.0, 0.0, 4.0, 4.0);
        let mask = Mask::rasterize(rect, 1, |x, y| solid(in_rect(x, y, 1.0, 1.0, 2.0, 2.0)));
        assert_eq!(mask.sample(1, 1), 1.0);
        assert_eq!(mask.sample(0, 0), 0.0);
        assert_eq!(mask.sample(-5, 2), 0.0);
    }

    #[test]
    fn test_box_sizes_are_odd() {
        for sigma in [0.5, 1.0, 2.5, 10.0] {
            for size in box_sizes(sigma) {
                assert_eq!(size % 2, 1);
            }
        }
    }

    #[test]
    fn test_intersect_empty() {
        let a = PixelRect::enclosing(0.0, 0.0, 4.0, 4.0);
        let b = PixelRect::enclosing(10.0, 10.0, 12.0, 12.0);
        assert!(a.intersect(b).is_empty());
    }
}
