//! Draws a frame's plan with the scene's GPU resources.

use glam::Mat4;
use orrery_config::RenderConfig;
use orrery_render::{
    DepthBuffer, FrameEncoder, FrameUniforms, ProgramSet, ProgramTargets, RenderContext,
    RenderPassBuilder, Renderable, ResourceStore, SurfaceError, TextureError, TransformUniform,
    clamp_surface_size,
};
use orrery_scene::{BodyId, BodyTable, DrawItem, DrawKind, projection_matrix};
use tracing::{debug, info};

use crate::assets::DecodedTexture;
use crate::error::AppError;

/// Transform slots reserved up front: one per body plus one per orbit line.
const INITIAL_TRANSFORM_CAPACITY: u32 = (BodyId::COUNT + BodyId::PLANETS.len()) as u32;

/// Owns the programs, buffers, textures and depth target for the scene.
pub struct SceneRenderer {
    programs: ProgramSet,
    store: ResourceStore,
    uniforms: FrameUniforms,
    depth: DepthBuffer,
    projection: Mat4,
    config: RenderConfig,
}

impl SceneRenderer {
    /// Compile both programs and upload every mesh, orbit line and
    /// placeholder texture in `bodies`.
    pub fn new(
        gpu: &RenderContext,
        config: &RenderConfig,
        bodies: &BodyTable,
    ) -> Result<Self, AppError> {
        let device = &gpu.device;
        let uniforms = FrameUniforms::new(device, INITIAL_TRANSFORM_CAPACITY);
        let mut store = ResourceStore::new(device);
        let programs = ProgramSet::new(
            device,
            &ProgramTargets {
                color_format: gpu.surface_format,
                transform_layout: uniforms.layout(),
                texture_layout: store.textures().bind_group_layout(),
            },
        )?;

        for body in bodies.iter() {
            let name = body.id.name();
            store.insert_mesh(device, name, &body.mesh.build()?);
            store.textures_mut().create_slot(device, &gpu.queue, name);
        }
        for id in BodyId::PLANETS {
            if let Some(orbit) = bodies.get(id).orbit() {
                let path = orrery_mesh::orbit_loop(orbit.distance, config.orbit_segments)?;
                store.insert_orbit(device, id.name(), &path);
            }
        }
        info!(
            meshes = store.mesh_count(),
            orbits = store.orbit_count(),
            textures = store.textures().len(),
            "Scene resources uploaded"
        );

        let (width, height) = gpu.size();
        Ok(Self {
            programs,
            store,
            uniforms,
            depth: DepthBuffer::new(device, width, height),
            projection: projection(config, width, height),
            config: config.clone(),
        })
    }

    /// Match the depth target and projection to a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (width, height) = clamp_surface_size(width, height);
        self.depth.resize(device, width, height);
        self.projection = projection(&self.config, width, height);
    }

    /// Swap decoded pixels into the slot named `key`.
    pub fn apply_texture(
        &mut self,
        gpu: &RenderContext,
        key: &str,
        texture: &DecodedTexture,
    ) -> Result<(), TextureError> {
        self.store.textures_mut().replace(
            &gpu.device,
            &gpu.queue,
            key,
            &texture.rgba,
            texture.width,
            texture.height,
        )
    }

    /// Draw `plan` in order and present.
    pub fn render(&mut self, gpu: &RenderContext, plan: &[DrawItem]) -> Result<(), SurfaceError> {
        let surface_texture = gpu.get_current_texture()?;

        self.uniforms.clear();
        let projection = self.projection;
        let offsets: Vec<u32> = plan
            .iter()
            .map(|item| {
                self.uniforms
                    .push(TransformUniform::new(projection, item.model_view))
            })
            .collect();
        self.uniforms.upload(&gpu.device, &gpu.queue);

        let mut frame = FrameEncoder::new(&gpu.device, surface_texture);
        {
            let builder = RenderPassBuilder::new()
                .label("scene")
                .clear_color(clear_color(&self.config))
                .depth(self.depth.view.clone(), DepthBuffer::CLEAR_VALUE);
            let mut pass = frame.begin_render_pass(&builder);
            for (item, offset) in plan.iter().zip(offsets) {
                let Some(renderable) = self.renderable(item.kind) else {
                    debug_assert!(false, "no GPU resources for {:?}", item.kind);
                    debug!("Skipping {:?}: no GPU resources", item.kind);
                    continue;
                };
                renderable.draw(&mut pass, &self.programs, self.uniforms.bind_group(), offset);
            }
        }
        frame.submit(&gpu.queue);
        Ok(())
    }

    fn renderable(&self, kind: DrawKind) -> Option<Renderable<'_>> {
        match kind {
            DrawKind::Body(id) => Some(Renderable::TexturedMesh {
                mesh: self.store.mesh(id.name())?,
                texture: self.store.textures().get(id.name())?,
            }),
            DrawKind::OrbitLine(id) => self.store.orbit(id.name()).map(Renderable::LineLoop),
        }
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }
}

fn projection(config: &RenderConfig, width: u32, height: u32) -> Mat4 {
    let (width, height) = clamp_surface_size(width, height);
    projection_matrix(
        config.fov_y_degrees,
        width as f32 / height as f32,
        config.near,
        config.far,
    )
}

fn clear_color(config: &RenderConfig) -> wgpu::Color {
    let [r, g, b, a] = config.clear_color;
    wgpu::Color { r, g, b, a }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_uses_aspect() {
        let config = RenderConfig::default();
        let wide = projection(&config, 1600, 800);
        let square = projection(&config, 800, 800);
        // x scale is the focal length divided by the aspect.
        assert!((wide.x_axis.x * 2.0 - square.x_axis.x).abs() < 1e-5);
        assert_eq!(wide.y_axis.y, square.y_axis.y);
    }

    #[test]
    fn test_zero_size_projection_is_finite() {
        let m = projection(&RenderConfig::default(), 0, 0);
        assert!(m.is_finite());
    }

    #[test]
    fn test_default_clear_color_is_black() {
        assert_eq!(clear_color(&RenderConfig::default()), wgpu::Color::BLACK);
    }

    #[test]
    fn test_transform_capacity_covers_full_plan() {
        assert_eq!(INITIAL_TRANSFORM_CAPACITY, 20);
    }
}
