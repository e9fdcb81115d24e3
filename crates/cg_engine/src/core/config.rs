//! # Application Configuration
//!
//! Settings for the two front ends: the mesh generator and the scene viewer.
//! Both are plain serde structs that can be stored as TOML or RON through
//! the [`Config`] trait; every field has a default, so partial files work.

use crate::assets::{RecordFormat, WriteOptions};
use crate::scene::camera::Projection;
use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// Environment variable naming the generator's configuration file
pub const GENERATOR_CONFIG_ENV: &str = "GENERATOR_CONFIG";

/// # Generator Configuration
///
/// Controls how generated meshes are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
    /// Record shape written to mesh files
    pub format: RecordFormat,
    /// Digits after the decimal point for non-integral values
    pub decimals: usize,
}

impl GeneratorConfig {
    /// Create a new generator configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            format: RecordFormat::Full,
            decimals: 4,
        }
    }

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the record shape
    #[must_use]
    pub fn with_format(mut self, format: RecordFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the decimal precision
    #[must_use]
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Load from the file named by `GENERATOR_CONFIG`, or use defaults when unset
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(GENERATOR_CONFIG_ENV) {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Writer options derived from this configuration
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            format: self.format,
            decimals: self.decimals,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for GeneratorConfig {}

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
        }
    }
}

impl WindowSize {
    /// Width over height; a zero height counts as one pixel
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// # Viewer Configuration
///
/// Window, projection and debug-overlay settings for anything that renders
/// a [`crate::scene::World`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
    /// Polyline segments per drawn translation path
    pub curve_samples: usize,
    /// Length of drawn normal segments
    pub normal_length: f32,
    /// Draw translation paths
    pub show_paths: bool,
    /// Draw vertex normals
    pub show_normals: bool,
    /// Initial window size
    pub window: WindowSize,
    /// Camera projection
    pub projection: Projection,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            curve_samples: 100,
            normal_length: 0.1,
            show_paths: true,
            show_normals: false,
            window: WindowSize::default(),
            projection: Projection::default(),
        }
    }
}

impl ViewerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(format!(
                "Window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            ));
        }
        let projection = &self.projection;
        if !(projection.fov > 0.0 && projection.fov < 180.0) {
            return Err(format!("Field of view must be in (0, 180), got {}", projection.fov));
        }
        if !(projection.near > 0.0 && projection.far > projection.near) {
            return Err(format!(
                "Clip planes must satisfy 0 < near < far, got near={} far={}",
                projection.near, projection.far
            ));
        }
        if self.curve_samples == 0 {
            return Err("curve_samples must be at least 1".to_string());
        }
        if !(self.normal_length.is_finite() && self.normal_length > 0.0) {
            return Err(format!("normal_length must be positive, got {}", self.normal_length));
        }
        Ok(())
    }
}

impl Config for ViewerConfig {}
