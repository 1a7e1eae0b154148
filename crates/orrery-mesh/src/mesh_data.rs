//! Indexed triangle-list mesh data shared by the sphere and ring generators.

/// Errors raised when a parameter set cannot produce a valid mesh.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// A band or segment count of zero produces no triangles.
    #[error("{what} must be at least 1")]
    ZeroSegments { what: &'static str },

    /// The vertex count does not fit a 16-bit index buffer.
    #[error("mesh needs {vertices} vertices but u16 indices address at most 65536")]
    TooManyVertices { vertices: usize },
}

/// Largest vertex count addressable with u16 indices.
pub const MAX_U16_VERTICES: usize = u16::MAX as usize + 1;

/// Immutable triangle-list geometry: positions (stride 3), texture coordinates
/// (stride 2), and a u16 index list.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<u16>,
}

impl MeshData {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of indices (three per triangle).
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Position data as raw bytes for buffer upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Texture coordinate data as raw bytes for buffer upload.
    pub fn tex_coord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tex_coords)
    }
}

pub(crate) fn check_vertex_budget(vertices: usize) -> Result<(), MeshError> {
    if vertices > MAX_U16_VERTICES {
        return Err(MeshError::TooManyVertices { vertices });
    }
    Ok(())
}
