//! Canvas configuration (glowbrush.yaml) parsing.
//!
//! The configuration describes the surface, the brush, the stroke delay
//! and the starting palette. Every field is optional; missing fields take
//! the same defaults as a fresh canvas, and out-of-range values are clamped
//! into range rather than rejected.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GlowError, Result};
use crate::render::clamp_density;
use crate::stroke::StrokeTiming;
use crate::types::{BrushConfig, Colour};

/// Default configuration file name.
pub const CONFIG_FILENAME: &str = "glowbrush.yaml";

/// Smallest logical surface side.
pub const MIN_SURFACE_SIZE: u32 = 100;

/// Largest logical surface side.
pub const MAX_SURFACE_SIZE: u32 = 2000;

/// Surface size and pixel density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    /// Physical pixels per logical pixel.
    pub density: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            density: 1.0,
        }
    }
}

/// Full canvas configuration loaded from glowbrush.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub canvas: SurfaceConfig,

    pub brush: BrushConfig,

    /// Minimum milliseconds between stamps.
    pub stroke_delay_ms: u64,

    /// Starting palette. Duplicates are dropped; empty means black.
    pub palette: Vec<Colour>,

    /// SVG brush image, relative to the config file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,

    /// Seed for colour variation and jitter. Random when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            canvas: SurfaceConfig::default(),
            brush: BrushConfig::default(),
            stroke_delay_ms: 0,
            palette: vec![Colour::BLACK],
            image: None,
            seed: None,
        }
    }
}

impl CanvasConfig {
    /// Load configuration from a YAML file.
    ///
    /// A relative `image` path is resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GlowError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        let mut config = Self::parse(&content)?;
        if let (Some(image), Some(dir)) = (&config.image, path.parent()) {
            if image.is_relative() {
                config.image = Some(dir.join(image));
            }
        }
        Ok(config)
    }

    /// Parse configuration from a YAML string and clamp it into range.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| GlowError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })?;
        Ok(config.normalized())
    }

    /// Clamp every value into its supported range.
    pub fn normalized(mut self) -> Self {
        self.canvas.width = clamp_surface(self.canvas.width);
        self.canvas.height = clamp_surface(self.canvas.height);
        self.canvas.density = clamp_density(self.canvas.density);
        self.brush = self.brush.normalized();
        self.stroke_delay_ms = StrokeTiming::new(self.stroke_delay_ms).min_delay();
        self
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| GlowError::Config {
            message: format!("Failed to serialize config: {}", e),
            help: None,
        })
    }
}

/// Clamp a logical surface side to `100..=2000`.
pub fn clamp_surface(size: u32) -> u32 {
    size.clamp(MIN_SURFACE_SIZE, MAX_SURFACE_SIZE)
}
