//! Configuration for the orrery viewer.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line. Missing sections and fields fall back to defaults, so old
//! config files keep loading as new settings appear.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AssetConfig, Config, DECLUTTER_ZOOM, DebugConfig, InputConfig, RenderConfig, SceneConfig,
    WindowConfig, ZoomRange, default_config_dir,
};
pub use error::ConfigError;
