//! Parametric geometry for the orrery: lat/long spheres, flat rings, and orbit loops.
//!
//! Every generator is a pure function of its numeric parameters. Output is plain
//! CPU-side data; uploading it to the GPU is the render crate's job.

pub mod mesh_data;
pub mod orbit;
pub mod ring;
pub mod sphere;

pub use mesh_data::{MeshData, MeshError};
pub use orbit::{DEFAULT_ORBIT_SEGMENTS, OrbitLoop, orbit_loop};
pub use ring::ring;
pub use sphere::sphere;
