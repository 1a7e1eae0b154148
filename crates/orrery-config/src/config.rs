//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "orrery";

/// Zoom below which the sun and the outer planets are drawn.
pub const DECLUTTER_ZOOM: f32 = -10.0;

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Camera input tuning.
    pub input: InputConfig,
    /// Scene start-up state.
    pub scene: SceneConfig,
    /// Texture asset settings.
    pub assets: AssetConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Window title prefix; the pause control label is appended.
    pub title: String,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
    /// Clear color as linear RGBA.
    pub clear_color: [f64; 4],
    /// Line segments per orbit path.
    pub orbit_segments: u32,
}

/// An inclusive zoom interval. Zoom is a negative camera distance, so `min`
/// is the farthest the camera may go and `max` the closest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ZoomRange {
    pub min: f32,
    pub max: f32,
}

impl ZoomRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp a zoom value into the range.
    pub fn clamp(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min, self.max)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min <= self.max && self.max < 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidZoomRange {
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Camera input tuning. Rates multiply raw pointer deltas in pixels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Zoom change per unit of wheel `deltaY`.
    pub wheel_zoom_rate: f32,
    /// Pan nudge toward the cursor per unit of wheel `deltaY`.
    pub wheel_pan_rate: f32,
    /// Pixels represented by one wheel line step.
    pub wheel_line_pixels: f32,
    /// Pan per pixel of primary-button drag.
    pub pan_rate: f32,
    /// Pitch/yaw radians per pixel of secondary-button drag.
    pub orbit_rate: f32,
    /// Pitch/yaw radians per pixel of single-finger drag.
    pub touch_orbit_rate: f32,
    /// Zoom change per pixel of pinch distance.
    pub pinch_zoom_rate: f32,
    /// Zoom bounds applied by the mouse wheel.
    pub wheel_zoom: ZoomRange,
    /// Zoom bounds applied by two-finger pinch.
    pub pinch_zoom: ZoomRange,
    /// Milliseconds after a multi-touch release before one-finger drags count.
    pub touch_debounce_ms: u64,
}

/// Scene start-up state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Initial camera zoom.
    pub initial_zoom: f32,
    /// Start with orbital motion paused.
    pub start_paused: bool,
    /// Zoom below which the sun and the outer planets are drawn.
    pub declutter_zoom: f32,
}

/// Texture asset settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory holding the body texture images.
    pub texture_dir: PathBuf,
    /// Number of background threads decoding textures.
    pub decode_workers: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Orrery".to_string(),
            vsync: true,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 200.0,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            orbit_segments: orrery_mesh::DEFAULT_ORBIT_SEGMENTS,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            wheel_zoom_rate: 0.01,
            wheel_pan_rate: 0.01,
            wheel_line_pixels: 100.0,
            pan_rate: 0.025,
            orbit_rate: 0.01,
            touch_orbit_rate: 0.03,
            pinch_zoom_rate: 0.01,
            wheel_zoom: ZoomRange::new(-80.0, -3.0),
            pinch_zoom: ZoomRange::new(-100.0, -3.0),
            touch_debounce_ms: 200,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            initial_zoom: -3.0,
            start_paused: false,
            declutter_zoom: DECLUTTER_ZOOM,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("textures"),
            decode_workers: 2,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for the viewer (e.g. `~/.config/orrery`).
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Reject settings the camera and projection cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.input.wheel_zoom.validate()?;
        self.input.pinch_zoom.validate()?;
        let render = &self.render;
        if !(render.near > 0.0 && render.far > render.near) {
            return Err(ConfigError::InvalidClipPlanes {
                near: render.near,
                far: render.far,
            });
        }
        Ok(())
    }
}
