//! Per-draw transform uniforms.
//!
//! Every draw of a frame gets its own [`TransformUniform`] slot inside one
//! buffer. Slots are spaced by the device's dynamic offset alignment, and
//! each draw binds the shared bind group at its slot's offset.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Projection and model-view matrices for one draw (`Transforms` in WGSL).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct TransformUniform {
    pub projection: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
}

impl TransformUniform {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub fn new(projection: Mat4, model_view: Mat4) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            model_view: model_view.to_cols_array_2d(),
        }
    }
}

/// Round `size` up to a multiple of `alignment`.
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

/// Staging area and GPU buffer for one frame's transforms.
pub struct FrameUniforms {
    layout: wgpu::BindGroupLayout,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: u32,
    staged: Vec<u8>,
}

impl FrameUniforms {
    /// Create storage for `capacity` draws. It grows on demand.
    pub fn new(device: &wgpu::Device, capacity: u32) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("transform-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(TransformUniform::SIZE),
                },
                count: None,
            }],
        });

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let stride = aligned_stride(TransformUniform::SIZE, alignment);
        let capacity = capacity.max(1);
        let (buffer, bind_group) = Self::allocate(device, &layout, stride, capacity);

        Self {
            layout,
            buffer,
            bind_group,
            stride,
            capacity,
            staged: Vec::with_capacity((stride * u64::from(capacity)) as usize),
        }
    }

    fn allocate(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: u32,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("transform-uniforms"),
            size: stride * u64::from(capacity),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("transform-bind-group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(TransformUniform::SIZE),
                }),
            }],
        });

        (buffer, bind_group)
    }

    /// Layout bound at group 0 by every program.
    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Draws staged so far this frame.
    pub fn len(&self) -> u32 {
        (self.staged.len() as u64 / self.stride) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Discard the previous frame's transforms.
    pub fn clear(&mut self) {
        self.staged.clear();
    }

    /// Stage one draw's transforms and return its dynamic offset.
    pub fn push(&mut self, uniform: TransformUniform) -> u32 {
        let offset = self.staged.len();
        self.staged.extend_from_slice(bytemuck::bytes_of(&uniform));
        self.staged.resize(offset + self.stride as usize, 0);
        offset as u32
    }

    /// Copy the staged transforms to the GPU, growing the buffer if needed.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        let needed = self.len();
        if needed > self.capacity {
            let capacity = needed.next_power_of_two();
            log::debug!("Growing transform uniforms {} -> {capacity}", self.capacity);
            (self.buffer, self.bind_group) =
                Self::allocate(device, &self.layout, self.stride, capacity);
            self.capacity = capacity;
        }
        if !self.staged.is_empty() {
            queue.write_buffer(&self.buffer, 0, &self.staged);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_device_queue;

    #[test]
    fn test_uniform_is_two_matrices() {
        assert_eq!(TransformUniform::SIZE, 128);
        assert_eq!(std::mem::offset_of!(TransformUniform, model_view), 64);
    }

    #[test]
    fn test_aligned_stride() {
        assert_eq!(aligned_stride(128, 256), 256);
        assert_eq!(aligned_stride(128, 64), 128);
        assert_eq!(aligned_stride(300, 256), 512);
    }

    #[test]
    fn test_uniform_keeps_column_major_order() {
        let model_view = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let uniform = TransformUniform::new(Mat4::IDENTITY, model_view);
        assert_eq!(uniform.model_view[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.projection[0], [1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_push_returns_aligned_offsets() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let mut uniforms = FrameUniforms::new(&device, 4);
        let stride = uniforms.stride() as u32;
        let uniform = TransformUniform::new(Mat4::IDENTITY, Mat4::IDENTITY);

        assert_eq!(uniforms.push(uniform), 0);
        assert_eq!(uniforms.push(uniform), stride);
        assert_eq!(uniforms.push(uniform), 2 * stride);
        assert_eq!(uniforms.len(), 3);

        uniforms.clear();
        assert!(uniforms.is_empty());
        assert_eq!(uniforms.push(uniform), 0);
    }

    #[test]
    fn test_upload_grows_capacity() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let mut uniforms = FrameUniforms::new(&device, 2);
        let uniform = TransformUniform::new(Mat4::IDENTITY, Mat4::IDENTITY);
        for _ in 0..21 {
            uniforms.push(uniform);
        }
        uniforms.upload(&device, &queue);
        assert_eq!(uniforms.capacity, 32);
    }
}
