//! Closed orbit-path polylines.

use std::f32::consts::TAU;

use crate::mesh_data::{MeshError, check_vertex_budget};

/// Segment count used for every orbit path in the scene.
pub const DEFAULT_ORBIT_SEGMENTS: u32 = 100;

/// A circle in the XZ plane, drawn as a line loop without an index buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitLoop {
    pub positions: Vec<[f32; 3]>,
}

impl OrbitLoop {
    /// Number of vertices passed to the draw call.
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    /// Position data as raw bytes for buffer upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }
}

/// Generate `segments + 1` points on a circle of `radius`. The last point
/// repeats the first so the loop closes even without primitive restart.
pub fn orbit_loop(radius: f32, segments: u32) -> Result<OrbitLoop, MeshError> {
    if segments == 0 {
        return Err(MeshError::ZeroSegments { what: "segments" });
    }
    check_vertex_budget(segments as usize + 1)?;

    let positions = (0..=segments)
        .map(|i| {
            let (sin_a, cos_a) = (i as f32 / segments as f32 * TAU).sin_cos();
            [radius * cos_a, 0.0, radius * sin_a]
        })
        .collect();

    Ok(OrbitLoop { positions })
}
