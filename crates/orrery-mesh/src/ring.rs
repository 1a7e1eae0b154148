//! Flat annulus in the XZ plane, used for planetary rings.

use std::f32::consts::TAU;

use crate::mesh_data::{MeshData, MeshError, check_vertex_budget};

/// Generate a flat ring between `inner_radius` and `outer_radius`.
///
/// Each of the `segments + 1` angle steps emits an outer-edge vertex followed
/// by an inner-edge vertex. The texture's `v` runs from 0 (inner) to 1 (outer)
/// and `u` wraps once around the ring.
pub fn ring(inner_radius: f32, outer_radius: f32, segments: u32) -> Result<MeshData, MeshError> {
    if segments == 0 {
        return Err(MeshError::ZeroSegments { what: "segments" });
    }

    let vertex_count = 2 * (segments as usize + 1);
    check_vertex_budget(vertex_count)?;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut tex_coords = Vec::with_capacity(vertex_count);

    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let (sin_a, cos_a) = (t * TAU).sin_cos();

        positions.push([outer_radius * cos_a, 0.0, outer_radius * sin_a]);
        tex_coords.push([t, 1.0]);

        positions.push([inner_radius * cos_a, 0.0, inner_radius * sin_a]);
        tex_coords.push([t, 0.0]);
    }

    let mut indices = Vec::with_capacity(6 * segments as usize);
    for i in 0..segments as u16 {
        let first = i * 2;
        let second = first + 1;
        let third = first + 2;
        let fourth = first + 3;

        indices.extend_from_slice(&[first, second, third]);
        indices.extend_from_slice(&[second, fourth, third]);
    }

    Ok(MeshData {
        positions,
        tex_coords,
        indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_counts() {
        for segments in [1, 3, 64] {
            let mesh = ring(2.2, 3.5, segments).unwrap();
            assert_eq!(mesh.vertex_count(), 2 * (segments as usize + 1));
            assert_eq!(mesh.index_count(), 6 * segments as usize);
        }
    }

    #[test]
    fn test_edges_at_their_radii() {
        let mesh = ring(2.2, 3.5, 64).unwrap();
        for (i, p) in mesh.positions.iter().enumerate() {
            let expected = if i % 2 == 0 { 3.5 } else { 2.2 };
            let len = Vec3::from_array(*p).length();
            assert!((len - expected).abs() < 1e-5, "vertex {i} at {len}");
            assert_eq!(p[1], 0.0);
        }
    }

    #[test]
    fn test_texture_coordinates() {
        let mesh = ring(1.0, 2.0, 4).unwrap();
        assert_eq!(mesh.tex_coords[0], [0.0, 1.0]);
        assert_eq!(mesh.tex_coords[1], [0.0, 0.0]);
        assert_eq!(mesh.tex_coords[4], [0.5, 1.0]);
        assert_eq!(mesh.tex_coords[9], [1.0, 0.0]);
    }

    #[test]
    fn test_strip_triangulation() {
        let mesh = ring(1.0, 2.0, 2).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2, 1, 3, 2, 2, 3, 4, 3, 5, 4]);
    }

    #[test]
    fn test_zero_segments_rejected() {
        assert_eq!(
            ring(1.0, 2.0, 0),
            Err(MeshError::ZeroSegments { what: "segments" })
        );
    }
}
