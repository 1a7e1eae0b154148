//! The two render programs and their semantic lookup tables.
//!
//! A program is a linked vertex/fragment pair plus fixed tables mapping
//! attribute and uniform names to where they live. The textured program
//! draws body meshes, the line program draws orbit paths in solid white.

use std::mem::offset_of;

use crate::buffer::{position_layout, tex_coord_layout};
use crate::depth::DepthBuffer;
use crate::shader::{CompiledShader, ShaderError, ShaderStage, check_link, compile};
use crate::uniforms::TransformUniform;

/// Bind group index of the per-draw transforms.
pub const TRANSFORM_GROUP: u32 = 0;
/// Bind group index of the body texture and sampler.
pub const TEXTURE_GROUP: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    VertexPosition,
    TextureCoord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uniform {
    ProjectionMatrix,
    ModelViewMatrix,
    Sampler,
}

/// Where a uniform lives: bind group, binding, and byte offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformBinding {
    pub group: u32,
    pub binding: u32,
    pub offset: u64,
}

const PROJECTION: UniformBinding = UniformBinding {
    group: TRANSFORM_GROUP,
    binding: 0,
    offset: offset_of!(TransformUniform, projection) as u64,
};

const MODEL_VIEW: UniformBinding = UniformBinding {
    group: TRANSFORM_GROUP,
    binding: 0,
    offset: offset_of!(TransformUniform, model_view) as u64,
};

const SAMPLER: UniformBinding = UniformBinding {
    group: TEXTURE_GROUP,
    binding: 1,
    offset: 0,
};

pub const TEXTURED_VERTEX_SOURCE: &str = r#"
struct Transforms {
    projection: mat4x4<f32>,
    model_view: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> transforms: Transforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coord: vec2<f32>,
};

@vertex
fn vs_main(
    @location(0) position: vec3<f32>,
    @location(1) tex_coord: vec2<f32>,
) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = transforms.projection * transforms.model_view * vec4<f32>(position, 1.0);
    out.tex_coord = tex_coord;
    return out;
}
"#;

pub const TEXTURED_FRAGMENT_SOURCE: &str = r#"
@group(1) @binding(0)
var body_texture: texture_2d<f32>;
@group(1) @binding(1)
var body_sampler: sampler;

@fragment
fn fs_main(@location(0) tex_coord: vec2<f32>) -> @location(0) vec4<f32> {
    return textureSample(body_texture, body_sampler, tex_coord);
}
"#;

pub const LINE_VERTEX_SOURCE: &str = r#"
struct Transforms {
    projection: mat4x4<f32>,
    model_view: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> transforms: Transforms;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return transforms.projection * transforms.model_view * vec4<f32>(position, 1.0);
}
"#;

pub const LINE_FRAGMENT_SOURCE: &str = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 1.0);
}
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramKind {
    Textured,
    Line,
}

impl ProgramKind {
    pub fn label(self) -> &'static str {
        match self {
            ProgramKind::Textured => "textured",
            ProgramKind::Line => "line",
        }
    }

    pub fn attributes(self) -> &'static [(Attribute, u32)] {
        match self {
            ProgramKind::Textured => &[
                (Attribute::VertexPosition, 0),
                (Attribute::TextureCoord, 1),
            ],
            ProgramKind::Line => &[(Attribute::VertexPosition, 0)],
        }
    }

    pub fn uniforms(self) -> &'static [(Uniform, UniformBinding)] {
        match self {
            ProgramKind::Textured => &[
                (Uniform::ProjectionMatrix, PROJECTION),
                (Uniform::ModelViewMatrix, MODEL_VIEW),
                (Uniform::Sampler, SAMPLER),
            ],
            ProgramKind::Line => &[
                (Uniform::ProjectionMatrix, PROJECTION),
                (Uniform::ModelViewMatrix, MODEL_VIEW),
            ],
        }
    }

    /// Vertex and fragment WGSL.
    pub fn sources(self) -> (&'static str, &'static str) {
        match self {
            ProgramKind::Textured => (TEXTURED_VERTEX_SOURCE, TEXTURED_FRAGMENT_SOURCE),
            ProgramKind::Line => (LINE_VERTEX_SOURCE, LINE_FRAGMENT_SOURCE),
        }
    }

    fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            ProgramKind::Textured => wgpu::PrimitiveTopology::TriangleList,
            ProgramKind::Line => wgpu::PrimitiveTopology::LineStrip,
        }
    }

    fn vertex_layouts(self) -> Vec<wgpu::VertexBufferLayout<'static>> {
        match self {
            ProgramKind::Textured => vec![position_layout(), tex_coord_layout()],
            ProgramKind::Line => vec![position_layout()],
        }
    }
}

/// Bind group layouts and target formats every program renders against.
pub struct ProgramTargets<'a> {
    pub color_format: wgpu::TextureFormat,
    pub transform_layout: &'a wgpu::BindGroupLayout,
    pub texture_layout: &'a wgpu::BindGroupLayout,
}

/// A linked render pipeline with its lookup tables.
pub struct RenderProgram {
    kind: ProgramKind,
    pipeline: wgpu::RenderPipeline,
}

impl RenderProgram {
    pub fn kind(&self) -> ProgramKind {
        self.kind
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn attribute_location(&self, attribute: Attribute) -> Option<u32> {
        lookup(self.kind.attributes(), attribute)
    }

    pub fn uniform_binding(&self, uniform: Uniform) -> Option<UniformBinding> {
        lookup(self.kind.uniforms(), uniform)
    }
}

fn lookup<K: PartialEq, V: Copy>(table: &[(K, V)], key: K) -> Option<V> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Link a compiled vertex/fragment pair into a program of `kind`.
pub fn link(
    device: &wgpu::Device,
    kind: ProgramKind,
    vertex: &CompiledShader,
    fragment: &CompiledShader,
    targets: &ProgramTargets<'_>,
) -> Result<RenderProgram, ShaderError> {
    let attribute_locations: Vec<u32> = kind.attributes().iter().map(|(_, loc)| *loc).collect();
    check_link(
        kind.label(),
        &vertex.interface,
        &fragment.interface,
        &attribute_locations,
    )?;

    let bind_group_layouts = match kind {
        ProgramKind::Textured => vec![targets.transform_layout, targets.texture_layout],
        ProgramKind::Line => vec![targets.transform_layout],
    };

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{}-pipeline-layout", kind.label())),
        bind_group_layouts: &bind_group_layouts,
        immediate_size: 0,
    });

    let vertex_layouts = kind.vertex_layouts();
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{}-pipeline", kind.label())),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &vertex.module,
            entry_point: Some(vertex.entry_point()),
            buffers: &vertex_layouts,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: kind.topology(),
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(DepthBuffer::stencil_state()),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &fragment.module,
            entry_point: Some(fragment.entry_point()),
            targets: &[Some(wgpu::ColorTargetState {
                format: targets.color_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    });

    log::info!("Linked '{}' program", kind.label());
    Ok(RenderProgram { kind, pipeline })
}

/// Compile both stages of `kind` from its built-in sources and link them.
pub fn build_program(
    device: &wgpu::Device,
    kind: ProgramKind,
    targets: &ProgramTargets<'_>,
) -> Result<RenderProgram, ShaderError> {
    let (vertex_source, fragment_source) = kind.sources();
    let vertex = compile(
        device,
        &format!("{}-vs", kind.label()),
        vertex_source,
        ShaderStage::Vertex,
    )?;
    let fragment = compile(
        device,
        &format!("{}-fs", kind.label()),
        fragment_source,
        ShaderStage::Fragment,
    )?;
    link(device, kind, &vertex, &fragment, targets)
}

/// Both programs the scene draws with.
pub struct ProgramSet {
    pub textured: RenderProgram,
    pub line: RenderProgram,
}

impl ProgramSet {
    pub fn new(device: &wgpu::Device, targets: &ProgramTargets<'_>) -> Result<Self, ShaderError> {
        Ok(Self {
            textured: build_program(device, ProgramKind::Textured, targets)?,
            line: build_program(device, ProgramKind::Line, targets)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::front_end;
    use crate::test_support::create_test_device_queue;
    use crate::texture::TextureStore;
    use crate::uniforms::FrameUniforms;

    #[test]
    fn test_textured_tables() {
        let kind = ProgramKind::Textured;
        assert_eq!(lookup(kind.attributes(), Attribute::VertexPosition), Some(0));
        assert_eq!(lookup(kind.attributes(), Attribute::TextureCoord), Some(1));
        assert_eq!(lookup(kind.uniforms(), Uniform::ProjectionMatrix), Some(PROJECTION));
        assert_eq!(
            lookup(kind.uniforms(), Uniform::ModelViewMatrix).map(|b| b.offset),
            Some(64)
        );
        assert_eq!(
            lookup(kind.uniforms(), Uniform::Sampler).map(|b| b.group),
            Some(TEXTURE_GROUP)
        );
    }

    #[test]
    fn test_sampler_entry_matches_wgsl() {
        let sampler = lookup(ProgramKind::Textured.uniforms(), Uniform::Sampler).unwrap();
        assert_eq!(sampler.binding, 1);
        let declaration = format!(
            "@group({}) @binding({})\nvar body_sampler: sampler;",
            sampler.group, sampler.binding
        );
        assert!(TEXTURED_FRAGMENT_SOURCE.contains(&declaration));
    }

    #[test]
    fn test_line_program_lacks_texture_entries() {
        let kind = ProgramKind::Line;
        assert_eq!(lookup(kind.attributes(), Attribute::VertexPosition), Some(0));
        assert_eq!(lookup(kind.attributes(), Attribute::TextureCoord), None);
        assert_eq!(lookup(kind.uniforms(), Uniform::Sampler), None);
        assert!(lookup(kind.uniforms(), Uniform::ModelViewMatrix).is_some());
    }

    #[test]
    fn test_builtin_sources_link() {
        for kind in [ProgramKind::Textured, ProgramKind::Line] {
            let (vs, fs) = kind.sources();
            let vs = front_end("vs", vs, ShaderStage::Vertex).unwrap();
            let fs = front_end("fs", fs, ShaderStage::Fragment).unwrap();
            let locations: Vec<u32> = kind.attributes().iter().map(|(_, l)| *l).collect();
            assert!(
                check_link(kind.label(), &vs, &fs, &locations).is_ok(),
                "{} program failed to link",
                kind.label()
            );
        }
    }

    #[test]
    fn test_textured_fragment_cannot_pair_with_line_vertex() {
        let vs = front_end("vs", LINE_VERTEX_SOURCE, ShaderStage::Vertex).unwrap();
        let fs = front_end("fs", TEXTURED_FRAGMENT_SOURCE, ShaderStage::Fragment).unwrap();
        assert!(matches!(
            check_link("mixed", &vs, &fs, &[0]),
            Err(ShaderError::Link { .. })
        ));
    }

    #[test]
    fn test_program_set_builds_on_gpu() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let uniforms = FrameUniforms::new(&device, 4);
        let textures = TextureStore::new(&device);
        let targets = ProgramTargets {
            color_format: wgpu::TextureFormat::Bgra8UnormSrgb,
            transform_layout: uniforms.layout(),
            texture_layout: textures.bind_group_layout(),
        };
        let programs = ProgramSet::new(&device, &targets).unwrap();
        assert_eq!(programs.textured.kind(), ProgramKind::Textured);
        assert_eq!(
            programs.line.attribute_location(Attribute::TextureCoord),
            None
        );
        assert_eq!(
            programs.textured.uniform_binding(Uniform::ProjectionMatrix),
            Some(PROJECTION)
        );
    }
}
