//! The solar system: every body's orbit, mesh and visibility in one table.

use crate::body::{BodyId, BodyTable, CelestialBody, MeshKind, Orbit, Placement, Visibility};

/// Bodies marked [`Visibility::ZoomedOut`] appear once zoom drops below this.
pub use orrery_config::DECLUTTER_ZOOM;

pub const RING_INNER_RADIUS: f32 = 2.2;
pub const RING_OUTER_RADIUS: f32 = 3.5;
pub const RING_SEGMENTS: u32 = 64;

const fn sphere(bands: u32, radius: f32) -> MeshKind {
    MeshKind::Sphere {
        lat_bands: bands,
        long_bands: bands,
        radius,
    }
}

const fn around_sun(distance: f32, speed: f32) -> Placement {
    Placement::Orbiting {
        parent: None,
        orbit: Orbit::new(distance, speed),
    }
}

fn body(id: BodyId, placement: Placement, mesh: MeshKind, visibility: Visibility) -> CelestialBody {
    CelestialBody {
        id,
        placement,
        mesh,
        visibility,
    }
}

/// The full body table with every angle at zero.
pub fn solar_system() -> BodyTable {
    use Visibility::{Always, ZoomedOut};

    BodyTable::from_ordered(vec![
        body(BodyId::Stars, Placement::Backdrop, sphere(30, 100.0), Always),
        body(BodyId::Earth, around_sun(9.5, 1.0), sphere(30, 1.0), Always),
        body(
            BodyId::Moon,
            Placement::Orbiting {
                parent: Some(BodyId::Earth),
                orbit: Orbit::new(2.0, 2.5),
            },
            sphere(20, 0.3),
            Always,
        ),
        body(BodyId::Sun, Placement::Center, sphere(30, 3.0), ZoomedOut),
        body(BodyId::Mercury, around_sun(5.0, 1.6), sphere(20, 0.5), ZoomedOut),
        body(BodyId::Venus, around_sun(6.7, 1.2), sphere(30, 0.9), ZoomedOut),
        body(BodyId::Mars, around_sun(12.0, 0.8), sphere(20, 0.7), ZoomedOut),
        body(BodyId::Jupiter, around_sun(15.0, 0.4), sphere(30, 2.0), ZoomedOut),
        body(BodyId::Saturn, around_sun(20.8, 0.3), sphere(30, 1.8), ZoomedOut),
        body(BodyId::Uranus, around_sun(26.0, 0.2), sphere(30, 1.6), ZoomedOut),
        body(BodyId::Neptune, around_sun(30.0, 0.1), sphere(30, 1.5), ZoomedOut),
        body(
            BodyId::SaturnRing,
            Placement::Attached(BodyId::Saturn),
            MeshKind::Ring {
                inner: RING_INNER_RADIUS,
                outer: RING_OUTER_RADIUS,
                segments: RING_SEGMENTS,
            },
            ZoomedOut,
        ),
    ])
}
