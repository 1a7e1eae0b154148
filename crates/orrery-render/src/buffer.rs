//! Vertex and index buffers for body meshes and orbit paths.
//!
//! Positions and texture coordinates live in separate buffers bound to
//! vertex slots 0 and 1, matching the attribute locations of the programs.

use orrery_mesh::{MeshData, OrbitLoop};
use wgpu::util::DeviceExt;

/// Vertex slot holding `vec3<f32>` positions.
pub const POSITION_SLOT: u32 = 0;
/// Vertex slot holding `vec2<f32>` texture coordinates.
pub const TEX_COORD_SLOT: u32 = 1;

/// An indexed, textured triangle mesh on the GPU.
pub struct TexturedMesh {
    pub positions: wgpu::Buffer,
    pub tex_coords: wgpu::Buffer,
    pub indices: wgpu::Buffer,
    pub index_count: u32,
}

impl TexturedMesh {
    /// Bind both vertex streams and the index buffer.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(POSITION_SLOT, self.positions.slice(..));
        render_pass.set_vertex_buffer(TEX_COORD_SLOT, self.tex_coords.slice(..));
        render_pass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint16);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// A closed polyline drawn without an index buffer.
pub struct LineLoop {
    pub positions: wgpu::Buffer,
    pub vertex_count: u32,
}

impl LineLoop {
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(POSITION_SLOT, self.positions.slice(..));
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.draw(0..self.vertex_count, 0..1);
    }
}

/// Creates immutable GPU buffers from generated geometry.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    pub fn create_textured_mesh(&self, label: &str, mesh: &MeshData) -> TexturedMesh {
        TexturedMesh {
            positions: self.create_buffer(
                &format!("{label}-positions"),
                mesh.position_bytes(),
                wgpu::BufferUsages::VERTEX,
            ),
            tex_coords: self.create_buffer(
                &format!("{label}-tex-coords"),
                mesh.tex_coord_bytes(),
                wgpu::BufferUsages::VERTEX,
            ),
            indices: self.create_buffer(
                &format!("{label}-indices"),
                bytemuck::cast_slice(&mesh.indices),
                wgpu::BufferUsages::INDEX,
            ),
            index_count: mesh.index_count() as u32,
        }
    }

    pub fn create_line_loop(&self, label: &str, orbit: &OrbitLoop) -> LineLoop {
        LineLoop {
            positions: self.create_buffer(
                &format!("{label}-positions"),
                orbit.position_bytes(),
                wgpu::BufferUsages::VERTEX,
            ),
            vertex_count: orbit.vertex_count(),
        }
    }

    fn create_buffer(
        &self,
        label: &str,
        contents: &[u8],
        usage: wgpu::BufferUsages,
    ) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            })
    }
}

/// Layout of the position stream (`@location(0) vec3<f32>`).
pub fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

/// Layout of the texture coordinate stream (`@location(1) vec2<f32>`).
pub fn tex_coord_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_device_queue;

    #[test]
    fn test_position_layout_stride_and_location() {
        let layout = position_layout();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
    }

    #[test]
    fn test_tex_coord_layout_stride_and_location() {
        let layout = tex_coord_layout();
        assert_eq!(layout.array_stride, 8);
        assert_eq!(layout.attributes[0].shader_location, 1);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn test_sphere_mesh_buffers() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let data = orrery_mesh::sphere(20, 20, 0.5).unwrap();
        let mesh = BufferAllocator::new(&device).create_textured_mesh("mercury", &data);
        assert_eq!(mesh.index_count, 2400);
        assert_eq!(mesh.positions.size(), 441 * 12);
        assert_eq!(mesh.tex_coords.size(), 441 * 8);
        assert!(mesh.indices.usage().contains(wgpu::BufferUsages::INDEX));
    }

    #[test]
    fn test_orbit_line_loop_buffer() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let orbit = orrery_mesh::orbit_loop(9.5, 100).unwrap();
        let line = BufferAllocator::new(&device).create_line_loop("earth-orbit", &orbit);
        assert_eq!(line.vertex_count, 101);
        assert_eq!(line.positions.size(), 101 * 12);
    }
}
