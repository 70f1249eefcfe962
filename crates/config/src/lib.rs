//! Shared configuration for Facet
//!
//! This crate provides the single source of truth for window dimensions and
//! the tunables of the viewport controller (camera defaults, input gains,
//! debug overlays).

use std::path::Path;

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default window width in pixels
pub const DEFAULT_WIDTH: u32 = 1280;

/// Default window height in pixels
pub const DEFAULT_HEIGHT: u32 = 720;

/// Default scale factor (1.0 = no scaling)
pub const DEFAULT_SCALE: f32 = 1.0;

/// Environment variable naming a JSON controller config file
pub const CONFIG_ENV_VAR: &str = "FACET_CONFIG";

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Display configuration for window and rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
pub struct DisplayConfig {
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
    /// Scale factor for DPI scaling
    pub scale: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
        }
    }
}

impl DisplayConfig {
    /// Create a new display config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: DEFAULT_SCALE,
        }
    }

    pub fn width_f32(&self) -> f32 {
        self.width as f32
    }

    pub fn height_f32(&self) -> f32 {
        self.height as f32
    }

    /// Width over height, used as the initial camera aspect ratio
    pub fn aspect_ratio(&self) -> f32 {
        self.width_f32() / self.height_f32().max(1.0)
    }
}

/// Initial camera placement and lens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
    pub near: f32,
    pub far: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub aspect_ratio: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [1.0, 2.0, 3.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            near: 0.1,
            far: 1000.0,
            fov_degrees: 45.0,
            aspect_ratio: 0.75,
        }
    }
}

/// Debug overlays drawn by the render pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugOptions {
    /// Draw the last picking ray
    pub show_picking_ray: bool,
    /// Draw every object's BVH boxes
    pub show_bvh: bool,
}

/// Viewport controller tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct ControllerConfig {
    /// Base of the exponential zoom per wheel notch
    pub wheel_scroll_factor: f32,
    /// Pan speed, scaled by the camera's distance to its target
    pub mouse_translation_factor: f32,
    /// Trackball radius in pixels until the first resize
    pub trackball_radius: f32,
    /// Pointer travel in pixels before a press becomes a drag
    pub drag_threshold: f32,
    pub camera: CameraConfig,
    pub debug: DebugOptions,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            wheel_scroll_factor: 0.8,
            mouse_translation_factor: 0.001,
            trackball_radius: 300.0,
            drag_threshold: 6.0,
            camera: CameraConfig::default(),
            debug: DebugOptions::default(),
        }
    }
}

impl ControllerConfig {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        tracing::info!("Loaded controller config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load from the file named by `FACET_CONFIG`, falling back to defaults
    pub fn from_env() -> Self {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_path(&path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring {}={}: {}", CONFIG_ENV_VAR, path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}
