//! The orrery viewer application: window, event loop, texture loading and
//! frame rendering.

pub mod assets;
pub mod error;
pub mod renderer;
pub mod window;

pub use assets::{AssetError, DecodedTexture, TextureLoader, decode_texture};
pub use error::AppError;
pub use renderer::SceneRenderer;
pub use window::{OrreryApp, run, window_title};
