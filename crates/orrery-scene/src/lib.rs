//! Solar-system scene: the body table, orbit animation, and per-frame draw
//! plan.
//!
//! Nothing here touches the GPU. The renderer walks the [`DrawItem`]s that
//! [`build_draw_plan`] returns and looks up GPU resources by [`BodyId::name`].

pub mod body;
pub mod catalog;
pub mod clock;
pub mod plan;
pub mod state;
pub mod transform;

pub use body::{BodyId, BodyTable, CelestialBody, MeshKind, Orbit, Placement, Visibility};
pub use catalog::{DECLUTTER_ZOOM, solar_system};
pub use clock::AnimationClock;
pub use plan::{DrawItem, DrawKind, body_matrices, build_draw_plan};
pub use state::SceneState;
pub use transform::{backdrop_matrix, camera_matrix, orbit_matrix, projection_matrix};
