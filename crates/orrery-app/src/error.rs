//! Startup failures that end the application.

use orrery_mesh::MeshError;
use orrery_render::{RenderContextError, ShaderError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    RenderContext(#[from] RenderContextError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("failed to build geometry: {0}")]
    Mesh(#[from] MeshError),
}
