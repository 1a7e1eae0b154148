//! Latitude/longitude UV sphere generation.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::mesh_data::{MeshData, MeshError, check_vertex_budget};

/// Generate a UV sphere of the given radius.
///
/// Vertices run over `lat in 0..=lat_bands` (pole to pole) and
/// `long in 0..=long_bands`, so the seam column is duplicated to carry both
/// `u = 1` and `u = 0`. Produces `(lat_bands + 1) * (long_bands + 1)` vertices
/// and `6 * lat_bands * long_bands` indices.
pub fn sphere(lat_bands: u32, long_bands: u32, radius: f32) -> Result<MeshData, MeshError> {
    if lat_bands == 0 {
        return Err(MeshError::ZeroSegments { what: "lat_bands" });
    }
    if long_bands == 0 {
        return Err(MeshError::ZeroSegments { what: "long_bands" });
    }

    let vertex_count = (lat_bands as usize + 1) * (long_bands as usize + 1);
    check_vertex_budget(vertex_count)?;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut tex_coords = Vec::with_capacity(vertex_count);

    for lat in 0..=lat_bands {
        let theta = lat as f32 * PI / lat_bands as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_bands {
            let phi = long as f32 * TAU / long_bands as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let unit = Vec3::new(cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
            positions.push((unit * radius).to_array());
            tex_coords.push([
                1.0 - long as f32 / long_bands as f32,
                1.0 - lat as f32 / lat_bands as f32,
            ]);
        }
    }

    let mut indices = Vec::with_capacity(6 * lat_bands as usize * long_bands as usize);
    for lat in 0..lat_bands {
        for long in 0..long_bands {
            let first = (lat * (long_bands + 1) + long) as u16;
            let second = first + long_bands as u16 + 1;

            indices.extend_from_slice(&[first, second, first + 1]);
            indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    Ok(MeshData {
        positions,
        tex_coords,
        indices,
    })
}
