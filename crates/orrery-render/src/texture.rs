//! Body textures: placeholder slots, sampling policy, and mipmap generation.
//!
//! Each texture key owns a [`TextureSlot`]. A slot starts out bound to a
//! 1×1 opaque white texel so bodies can draw before their image is decoded;
//! [`TextureStore::replace`] swaps in the decoded pixels later.

use std::collections::HashMap;

/// Format of every body texture. Images are uploaded as sRGB RGBA8.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

const PLACEHOLDER_TEXEL: [u8; 4] = [255, 255, 255, 255];

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error(
        "texture data size ({actual}) does not match expected ({expected}) for {width}x{height}"
    )]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    #[error("texture {width}x{height} exceeds the device limit of {max}")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("no texture slot named '{0}'")]
    UnknownSlot(String),
}

/// How a texture is sampled, chosen from its dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingPolicy {
    /// Power-of-two: full mip chain, repeat wrap, trilinear minification.
    Mipmapped,
    /// Anything else: single level, clamp-to-edge, linear minification.
    Clamped,
}

impl SamplingPolicy {
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        if width.is_power_of_two() && height.is_power_of_two() {
            SamplingPolicy::Mipmapped
        } else {
            SamplingPolicy::Clamped
        }
    }

    pub fn mip_level_count(self, width: u32, height: u32) -> u32 {
        match self {
            SamplingPolicy::Mipmapped => mip_level_count(width, height),
            SamplingPolicy::Clamped => 1,
        }
    }
}

/// Number of levels in a full mip chain for the given dimensions.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    width.max(height).max(1).ilog2() + 1
}

/// The texture currently bound for one key.
pub struct TextureSlot {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub bind_group: wgpu::BindGroup,
    pub dimensions: (u32, u32),
    pub policy: SamplingPolicy,
    pub mip_level_count: u32,
    /// False while the placeholder is bound.
    pub loaded: bool,
}

/// Owns every body texture slot plus the shared samplers and mip blitter.
pub struct TextureStore {
    slots: HashMap<String, TextureSlot>,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler_mipmapped: wgpu::Sampler,
    sampler_clamped: wgpu::Sampler,
    mip_blitter: MipBlitter,
}

impl TextureStore {
    pub fn new(device: &wgpu::Device) -> Self {
        let sampler_mipmapped = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sampler-mipmapped"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        let sampler_clamped = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sampler-clamped"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self {
            slots: HashMap::new(),
            bind_group_layout: texture_bind_group_layout(device, "texture-bind-group-layout"),
            sampler_mipmapped,
            sampler_clamped,
            mip_blitter: MipBlitter::new(device, TEXTURE_FORMAT),
        }
    }

    /// Layout bound at group 1 by the textured program.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Create a slot bound to the white placeholder. Existing slots are left alone.
    pub fn create_slot(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, key: &str) {
        if self.slots.contains_key(key) {
            return;
        }
        match self.upload(device, queue, key, &PLACEHOLDER_TEXEL, 1, 1) {
            Ok(mut slot) => {
                slot.loaded = false;
                self.slots.insert(key.to_string(), slot);
            }
            Err(e) => log::error!("Placeholder for '{key}' rejected: {e}"),
        }
    }

    /// Swap decoded RGBA8 pixels into an existing slot.
    pub fn replace(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        key: &str,
        rgba: &[u8],
        width: u32,
        height: u32,
    ) -> Result<(), TextureError> {
        if !self.slots.contains_key(key) {
            return Err(TextureError::UnknownSlot(key.to_string()));
        }
        let slot = self.upload(device, queue, key, rgba, width, height)?;
        log::info!(
            "Loaded texture '{key}' ({width}x{height}, {:?}, {} mips)",
            slot.policy,
            slot.mip_level_count
        );
        self.slots.insert(key.to_string(), slot);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&TextureSlot> {
        self.slots.get(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn upload(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        key: &str,
        rgba: &[u8],
        width: u32,
        height: u32,
    ) -> Result<TextureSlot, TextureError> {
        validate_dimensions(width, height, device.limits().max_texture_dimension_2d)?;
        validate_data_size(rgba, width, height)?;

        let policy = SamplingPolicy::for_dimensions(width, height);
        let mip_levels = policy.mip_level_count(width, height);
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(key),
            size,
            mip_level_count: mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: None,
            },
            size,
        );

        if mip_levels > 1 {
            self.mip_blitter.generate(device, queue, &texture, mip_levels);
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = match policy {
            SamplingPolicy::Mipmapped => &self.sampler_mipmapped,
            SamplingPolicy::Clamped => &self.sampler_clamped,
        };
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{key}-bind-group")),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Ok(TextureSlot {
            texture,
            view,
            bind_group,
            dimensions: (width, height),
            policy,
            mip_level_count: mip_levels,
            loaded: true,
        })
    }
}

/// Texture at binding 0, filtering sampler at binding 1, fragment visible.
fn texture_bind_group_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

const BLIT_SHADER_SOURCE: &str = r#"
@group(0) @binding(0) var src_texture: texture_2d<f32>;
@group(0) @binding(1) var src_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    var out: VertexOutput;
    out.position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(src_texture, src_sampler, in.uv);
}
"#;

/// Downsamples each mip level from the one above with a fullscreen triangle.
struct MipBlitter {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl MipBlitter {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let bind_group_layout = texture_bind_group_layout(device, "mip-blit-bind-group-layout");

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mip-blit-shader"),
            source: wgpu::ShaderSource::Wgsl(BLIT_SHADER_SOURCE.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mip-blit-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mip-blit-pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("mip-blit-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            pipeline,
            bind_group_layout,
            sampler,
        }
    }

    fn generate(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &wgpu::Texture,
        mip_count: u32,
    ) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("mip-blit-encoder"),
        });

        let level_view = |level: u32| {
            texture.create_view(&wgpu::TextureViewDescriptor {
                base_mip_level: level,
                mip_level_count: Some(1),
                ..Default::default()
            })
        };

        for level in 1..mip_count {
            let src_view = level_view(level - 1);
            let dst_view = level_view(level);

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("mip-blit-bind-group"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&src_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            });

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mip-blit-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &dst_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn validate_dimensions(width: u32, height: u32, max: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    if width > max || height > max {
        return Err(TextureError::TooLarge { width, height, max });
    }
    Ok(())
}

fn validate_data_size(data: &[u8], width: u32, height: u32) -> Result<(), TextureError> {
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: data.len(),
            expected,
            width,
            height,
        });
    }
    Ok(())
}
