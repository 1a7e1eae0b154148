//! The ordered list of draws for one frame.

use glam::Mat4;

use crate::body::{BodyId, BodyTable, Placement};
use crate::state::SceneState;
use crate::transform::{backdrop_matrix, camera_matrix, orbit_matrix};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    /// A textured body mesh.
    Body(BodyId),
    /// The orbit line of a planet.
    OrbitLine(BodyId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub kind: DrawKind,
    pub model_view: Mat4,
}

/// Model-view matrix of every body, indexed like [`BodyId::ALL`].
pub fn body_matrices(bodies: &BodyTable, camera: Mat4) -> [Mat4; BodyId::COUNT] {
    let mut matrices = [Mat4::IDENTITY; BodyId::COUNT];
    for (slot, id) in matrices.iter_mut().zip(BodyId::ALL) {
        *slot = body_matrix(bodies, camera, id);
    }
    matrices
}

fn body_matrix(bodies: &BodyTable, camera: Mat4, id: BodyId) -> Mat4 {
    match bodies.get(id).placement {
        Placement::Backdrop => backdrop_matrix(camera),
        Placement::Center => camera,
        Placement::Orbiting { parent, orbit } => {
            let frame = parent.map_or(camera, |p| body_matrix(bodies, camera, p));
            orbit_matrix(frame, &orbit)
        }
        Placement::Attached(parent) => body_matrix(bodies, camera, parent),
    }
}

/// Starfield, then every orbit line, then the visible bodies in
/// [`BodyId::ALL`] order.
pub fn build_draw_plan(state: &SceneState) -> Vec<DrawItem> {
    let camera = camera_matrix(&state.camera);
    let matrices = body_matrices(&state.bodies, camera);

    let orbit_lines = BodyId::PLANETS.into_iter().map(|id| DrawItem {
        kind: DrawKind::OrbitLine(id),
        model_view: camera,
    });
    let bodies = BodyId::ALL
        .into_iter()
        .zip(matrices)
        .filter(|(id, _)| state.is_visible(*id))
        .map(|(id, model_view)| DrawItem {
            kind: DrawKind::Body(id),
            model_view,
        });

    let mut plan = Vec::with_capacity(BodyId::PLANETS.len() + BodyId::COUNT);
    let mut bodies = bodies.peekable();
    // The starfield goes under everything, orbit lines included.
    if let Some(stars) = bodies.next_if(|item| item.kind == DrawKind::Body(BodyId::Stars)) {
        plan.push(stars);
    }
    plan.extend(orbit_lines);
    plan.extend(bodies);
    plan
}
