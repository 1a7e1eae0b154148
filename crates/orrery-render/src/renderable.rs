//! Things that can be drawn with one of the two programs.

use crate::buffer::{LineLoop, TexturedMesh};
use crate::program::{ProgramKind, ProgramSet, TEXTURE_GROUP, TRANSFORM_GROUP};
use crate::texture::TextureSlot;

/// One draw: geometry plus whatever the program needs besides transforms.
#[derive(Clone, Copy)]
pub enum Renderable<'a> {
    TexturedMesh {
        mesh: &'a TexturedMesh,
        texture: &'a TextureSlot,
    },
    LineLoop(&'a LineLoop),
}

impl Renderable<'_> {
    pub fn program_kind(&self) -> ProgramKind {
        match self {
            Renderable::TexturedMesh { .. } => ProgramKind::Textured,
            Renderable::LineLoop(_) => ProgramKind::Line,
        }
    }

    /// Record the draw. `transform_offset` selects this draw's slot in the
    /// frame's transform uniforms.
    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        programs: &ProgramSet,
        transforms: &wgpu::BindGroup,
        transform_offset: u32,
    ) {
        match self {
            Renderable::TexturedMesh { mesh, texture } => {
                debug_assert!(mesh.index_count > 0, "textured mesh without indices");
                render_pass.set_pipeline(programs.textured.pipeline());
                render_pass.set_bind_group(TRANSFORM_GROUP, transforms, &[transform_offset]);
                render_pass.set_bind_group(TEXTURE_GROUP, &texture.bind_group, &[]);
                mesh.bind(render_pass);
                mesh.draw(render_pass);
            }
            Renderable::LineLoop(line) => {
                debug_assert!(line.vertex_count > 1, "line loop needs two vertices");
                render_pass.set_pipeline(programs.line.pipeline());
                render_pass.set_bind_group(TRANSFORM_GROUP, transforms, &[transform_offset]);
                line.bind(render_pass);
                line.draw(render_pass);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::DepthBuffer;
    use crate::pass::RenderPassBuilder;
    use crate::program::ProgramTargets;
    use crate::store::ResourceStore;
    use crate::test_support::create_test_device_queue;
    use crate::uniforms::{FrameUniforms, TransformUniform};
    use glam::Mat4;

    #[test]
    fn test_draws_both_kinds_offscreen() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let color_format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let mut uniforms = FrameUniforms::new(&device, 2);
        let mut store = ResourceStore::new(&device);
        let programs = ProgramSet::new(
            &device,
            &ProgramTargets {
                color_format,
                transform_layout: uniforms.layout(),
                texture_layout: store.textures().bind_group_layout(),
            },
        )
        .unwrap();

        store.insert_mesh(&device, "earth", &orrery_mesh::sphere(30, 30, 1.0).unwrap());
        store.insert_orbit(&device, "earth", &orrery_mesh::orbit_loop(9.5, 100).unwrap());
        store.textures_mut().create_slot(&device, &queue, "earth");

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen"),
            size: wgpu::Extent3d {
                width: 64,
                height: 64,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: color_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = DepthBuffer::new(&device, 64, 64);

        let items = [
            Renderable::LineLoop(store.orbit("earth").unwrap()),
            Renderable::TexturedMesh {
                mesh: store.mesh("earth").unwrap(),
                texture: store.textures().get("earth").unwrap(),
            },
        ];
        assert_eq!(items[0].program_kind(), ProgramKind::Line);
        assert_eq!(items[1].program_kind(), ProgramKind::Textured);

        let projection = Mat4::perspective_rh(45f32.to_radians(), 1.0, 0.1, 200.0);
        let offsets: Vec<u32> = items
            .iter()
            .map(|_| {
                uniforms.push(TransformUniform::new(
                    projection,
                    Mat4::from_translation(glam::Vec3::new(0.0, 0.0, -20.0)),
                ))
            })
            .collect();
        uniforms.upload(&device, &queue);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("offscreen-encoder"),
        });
        {
            let builder =
                RenderPassBuilder::new().depth(depth.view.clone(), DepthBuffer::CLEAR_VALUE);
            let mut pass = builder.begin(&mut encoder, &target_view);
            for (item, offset) in items.iter().zip(&offsets) {
                item.draw(&mut pass, &programs, uniforms.bind_group(), *offset);
            }
        }
        queue.submit([encoder.finish()]);
    }
}
