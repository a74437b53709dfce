//! Fixed frame rate capture of a surface, written out as an animated GIF.
//!
//! The recorder samples the surface on a fixed timeline. Runs of identical
//! frames are stored once with a longer delay, so idle stretches cost
//! nothing. A frame is shown for at most `MAX_HOLD_MS` in the animation;
//! longer idle stretches are shortened.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::error::{GlowError, Result};

use super::Surface;

/// Highest supported capture rate.
pub const MAX_FPS: u32 = 60;

/// Longest time a single frame is shown in the written animation.
pub const MAX_HOLD_MS: u32 = 10_000;

/// A captured frame held for `ticks` frame intervals.
#[derive(Debug)]
struct HeldFrame {
    image: RgbaImage,
    ticks: u64,
}

/// Captures a surface at a fixed frame rate.
#[derive(Debug)]
pub struct FrameRecorder {
    fps: u32,
    started_at: Option<u64>,
    next_tick: u64,
    frames: Vec<HeldFrame>,
}

impl FrameRecorder {
    /// Create a recorder. The rate is clamped to `1..=60` frames per second.
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.clamp(1, MAX_FPS),
            started_at: None,
            next_tick: 0,
            frames: Vec::new(),
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Number of frame intervals captured so far.
    pub fn tick_count(&self) -> u64 {
        self.next_tick
    }

    /// Number of distinct frames stored.
    pub fn stored_frames(&self) -> usize {
        self.frames.len()
    }

    /// Capture every frame due strictly before `now_ms` using the current
    /// surface content. The first call starts the timeline.
    pub fn advance_to(&mut self, surface: &Surface, now_ms: u64) {
        let start = *self.started_at.get_or_insert(now_ms);
        // First tick at or after `now_ms`: tick * 1000 / fps >= elapsed.
        let elapsed = now_ms.saturating_sub(start);
        let end = elapsed.saturating_mul(self.fps as u64).div_ceil(1000);
        if end > self.next_tick {
            self.push(surface.pixels(), end - self.next_tick);
        }
    }

    /// Capture a final frame and write the animation to `path`.
    ///
    /// Returns the number of frame intervals recorded.
    pub fn finish(mut self, surface: &Surface, path: &Path) -> Result<u64> {
        self.push(surface.pixels(), 1);
        let ticks = self.next_tick;

        let file = File::create(path).map_err(|e| GlowError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to create recording: {}", e),
        })?;
        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder.set_repeat(Repeat::Infinite).map_err(encode_error)?;

        let fps = self.fps;
        let frames = self.frames.into_iter().map(|held| {
            let numer = held
                .ticks
                .saturating_mul(1000)
                .min(MAX_HOLD_MS as u64 * fps as u64);
            let delay = Delay::from_numer_denom_ms(numer as u32, fps);
            Frame::from_parts(held.image, 0, 0, delay)
        });
        encoder.encode_frames(frames).map_err(encode_error)?;

        Ok(ticks)
    }

    fn push(&mut self, pixels: &RgbaImage, ticks: u64) {
        self.next_tick += ticks;
        if let Some(last) = self.frames.last_mut() {
            if last.image == *pixels {
                last.ticks += ticks;
                return;
            }
        }
        self.frames.push(HeldFrame {
            image: pixels.clone(),
            ticks,
        });
    }
}

fn encode_error(e: image::ImageError) -> GlowError {
    GlowError::Output {
        message: format!("Failed to encode recording: {}", e),
        help: None,
    }
}
