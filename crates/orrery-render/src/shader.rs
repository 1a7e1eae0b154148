//! WGSL shader compilation and stage interface checks.
//!
//! Sources go through naga's WGSL front end and validator before wgpu sees
//! them, so a bad shader surfaces as a [`ShaderError`] carrying the full
//! diagnostic instead of a device validation panic.

use std::fmt;

use log::debug;
use naga::valid::{Capabilities, ValidationFlags, Validator};

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("{stage} shader '{label}' failed to compile:\n{log}")]
    Compile {
        label: String,
        stage: ShaderStage,
        log: String,
    },

    #[error("program '{label}' failed to link:\n{log}")]
    Link { label: String, log: String },
}

/// User-defined `@location`s read and written by one entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageInterface {
    pub stage: ShaderStage,
    pub entry_point: String,
    pub inputs: Vec<u32>,
    pub outputs: Vec<u32>,
}

/// A validated shader module ready to be used in a pipeline.
pub struct CompiledShader {
    pub label: String,
    pub interface: StageInterface,
    pub module: wgpu::ShaderModule,
}

impl CompiledShader {
    pub fn stage(&self) -> ShaderStage {
        self.interface.stage
    }

    pub fn entry_point(&self) -> &str {
        &self.interface.entry_point
    }
}

/// Parse and validate `source`, then create the GPU module.
pub fn compile(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    stage: ShaderStage,
) -> Result<CompiledShader, ShaderError> {
    let interface = front_end(label, source, stage)?;

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    debug!("Compiled {stage} shader '{label}' ({})", interface.entry_point);

    Ok(CompiledShader {
        label: label.to_string(),
        interface,
        module,
    })
}

/// CPU half of [`compile`]: WGSL parsing, validation and entry point lookup.
pub fn front_end(
    label: &str,
    source: &str,
    stage: ShaderStage,
) -> Result<StageInterface, ShaderError> {
    let compile_error = |log: String| ShaderError::Compile {
        label: label.to_string(),
        stage,
        log,
    };

    let module =
        naga::front::wgsl::parse_str(source).map_err(|e| compile_error(e.emit_to_string(source)))?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| compile_error(e.emit_to_string(source)))?;

    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage.naga())
        .ok_or_else(|| compile_error(format!("no @{stage} entry point in source")))?;

    let mut inputs = Vec::new();
    for argument in &entry.function.arguments {
        collect_locations(&module, argument.ty, argument.binding.as_ref(), &mut inputs);
    }
    let mut outputs = Vec::new();
    if let Some(result) = &entry.function.result {
        collect_locations(&module, result.ty, result.binding.as_ref(), &mut outputs);
    }
    inputs.sort_unstable();
    outputs.sort_unstable();

    Ok(StageInterface {
        stage,
        entry_point: entry.name.clone(),
        inputs,
        outputs,
    })
}

/// Locations of a bound value, or of each member when it is an unbound struct.
fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => out.push(*location),
        Some(_) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                out.extend(members.iter().filter_map(|member| match &member.binding {
                    Some(naga::Binding::Location { location, .. }) => Some(*location),
                    _ => None,
                }));
            }
        }
    }
}

/// Check that two stages can be linked into one program fed by vertex
/// buffers providing `attribute_locations`.
pub fn check_link(
    label: &str,
    vertex: &StageInterface,
    fragment: &StageInterface,
    attribute_locations: &[u32],
) -> Result<(), ShaderError> {
    let mut problems = Vec::new();

    if vertex.stage != ShaderStage::Vertex {
        problems.push(format!("expected a vertex shader, got {}", vertex.stage));
    }
    if fragment.stage != ShaderStage::Fragment {
        problems.push(format!("expected a fragment shader, got {}", fragment.stage));
    }
    for location in &fragment.inputs {
        if !vertex.outputs.contains(location) {
            problems.push(format!(
                "fragment input @location({location}) is not written by the vertex stage"
            ));
        }
    }
    for location in &vertex.inputs {
        if !attribute_locations.contains(location) {
            problems.push(format!(
                "vertex input @location({location}) has no vertex attribute"
            ));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ShaderError::Link {
            label: label.to_string(),
            log: problems.join("\n"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_device_queue;

    const VERTEX: &str = r#"
        struct VertexOutput {
            @builtin(position) clip_position: vec4<f32>,
            @location(0) tex_coord: vec2<f32>,
        };

        @vertex
        fn vs_main(@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>) -> VertexOutput {
            var out: VertexOutput;
            out.clip_position = vec4<f32>(position, 1.0);
            out.tex_coord = uv;
            return out;
        }
    "#;

    const FRAGMENT: &str = r#"
        @fragment
        fn fs_main(@location(0) tex_coord: vec2<f32>) -> @location(0) vec4<f32> {
            return vec4<f32>(tex_coord, 0.0, 1.0);
        }
    "#;

    const FRAGMENT_WANTS_LOCATION_3: &str = r#"
        @fragment
        fn fs_main(@location(3) shade: f32) -> @location(0) vec4<f32> {
            return vec4<f32>(shade);
        }
    "#;

    #[test]
    fn test_vertex_interface_locations() {
        let iface = front_end("vs", VERTEX, ShaderStage::Vertex).unwrap();
        assert_eq!(iface.entry_point, "vs_main");
        assert_eq!(iface.inputs, vec![0, 1]);
        assert_eq!(iface.outputs, vec![0]);
    }

    #[test]
    fn test_fragment_interface_locations() {
        let iface = front_end("fs", FRAGMENT, ShaderStage::Fragment).unwrap();
        assert_eq!(iface.inputs, vec![0]);
        assert_eq!(iface.outputs, vec![0]);
    }

    #[test]
    fn test_syntax_error_reports_log() {
        let err = front_end("broken", "fn vs_main( {", ShaderStage::Vertex).unwrap_err();
        match err {
            ShaderError::Compile { label, stage, log } => {
                assert_eq!(label, "broken");
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_undeclared_identifier_rejected() {
        let source = r#"
            @vertex
            fn vs_main() -> @builtin(position) vec4<f32> {
                return undeclared_variable;
            }
        "#;
        let err = front_end("undeclared", source, ShaderStage::Vertex).unwrap_err();
        assert!(err.to_string().contains("undeclared"));
    }

    #[test]
    fn test_missing_stage_entry_point() {
        let err = front_end("fs-as-vs", FRAGMENT, ShaderStage::Vertex).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Compile {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
        assert!(err.to_string().contains("no @vertex entry point"));
    }

    #[test]
    fn test_matching_interfaces_link() {
        let vs = front_end("vs", VERTEX, ShaderStage::Vertex).unwrap();
        let fs = front_end("fs", FRAGMENT, ShaderStage::Fragment).unwrap();
        assert!(check_link("textured", &vs, &fs, &[0, 1]).is_ok());
    }

    #[test]
    fn test_unwritten_fragment_input_fails_link() {
        let vs = front_end("vs", VERTEX, ShaderStage::Vertex).unwrap();
        let fs = front_end("fs", FRAGMENT_WANTS_LOCATION_3, ShaderStage::Fragment).unwrap();
        let err = check_link("mismatch", &vs, &fs, &[0, 1]).unwrap_err();
        match err {
            ShaderError::Link { label, log } => {
                assert_eq!(label, "mismatch");
                assert!(log.contains("@location(3)"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_swapped_roles_fail_link() {
        let vs = front_end("vs", VERTEX, ShaderStage::Vertex).unwrap();
        let fs = front_end("fs", FRAGMENT, ShaderStage::Fragment).unwrap();
        let err = check_link("swapped", &fs, &vs, &[0, 1]).unwrap_err();
        assert!(err.to_string().contains("expected a vertex shader"));
    }

    #[test]
    fn test_missing_vertex_attribute_fails_link() {
        let vs = front_end("vs", VERTEX, ShaderStage::Vertex).unwrap();
        let fs = front_end("fs", FRAGMENT, ShaderStage::Fragment).unwrap();
        let err = check_link("no-uv", &vs, &fs, &[0]).unwrap_err();
        assert!(err.to_string().contains("@location(1) has no vertex attribute"));
    }

    #[test]
    fn test_compile_creates_module() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let shader = compile(&device, "vs", VERTEX, ShaderStage::Vertex).unwrap();
        assert_eq!(shader.stage(), ShaderStage::Vertex);
        assert_eq!(shader.entry_point(), "vs_main");
    }
}
