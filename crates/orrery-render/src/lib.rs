//! wgpu rendering for the orrery: device setup, shader programs, GPU
//! resources, and per-draw plumbing.

pub mod buffer;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod program;
pub mod renderable;
pub mod shader;
pub mod store;
pub mod texture;
pub mod uniforms;

pub use buffer::{BufferAllocator, LineLoop, TexturedMesh};
pub use depth::DepthBuffer;
pub use gpu::{
    RenderContext, RenderContextError, SurfaceError, clamp_surface_size,
    init_render_context_blocking,
};
pub use pass::{FrameEncoder, RenderPassBuilder};
pub use program::{
    Attribute, ProgramKind, ProgramSet, ProgramTargets, RenderProgram, Uniform, UniformBinding,
};
pub use renderable::Renderable;
pub use shader::{CompiledShader, ShaderError, ShaderStage, StageInterface};
pub use store::ResourceStore;
pub use texture::{SamplingPolicy, TEXTURE_FORMAT, TextureError, TextureSlot, TextureStore};
pub use uniforms::{FrameUniforms, TransformUniform};

/// Headless device for GPU tests. `None` when no adapter is available.
#[cfg(test)]
pub(crate) mod test_support {
    pub(crate) fn create_test_device_queue() -> Option<(wgpu::Device, wgpu::Queue)> {
        pollster::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::all(),
                ..Default::default()
            });

            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    compatible_surface: None,
                    force_fallback_adapter: false,
                })
                .await
                .ok()?;

            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .ok()
        })
    }
}
