//! Celestial body descriptions.

use orrery_mesh::{MeshData, MeshError};

/// Every drawable body, declared in the order bodies are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyId {
    Stars,
    Earth,
    Moon,
    Sun,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    SaturnRing,
}

impl BodyId {
    pub const COUNT: usize = 12;

    pub const ALL: [BodyId; Self::COUNT] = [
        BodyId::Stars,
        BodyId::Earth,
        BodyId::Moon,
        BodyId::Sun,
        BodyId::Mercury,
        BodyId::Venus,
        BodyId::Mars,
        BodyId::Jupiter,
        BodyId::Saturn,
        BodyId::Uranus,
        BodyId::Neptune,
        BodyId::SaturnRing,
    ];

    /// The eight planets, nearest the sun first. Orbit lines are drawn in
    /// this order.
    pub const PLANETS: [BodyId; 8] = [
        BodyId::Mercury,
        BodyId::Venus,
        BodyId::Earth,
        BodyId::Mars,
        BodyId::Jupiter,
        BodyId::Saturn,
        BodyId::Uranus,
        BodyId::Neptune,
    ];

    /// Stable key for meshes, orbit lines and texture slots.
    pub fn name(self) -> &'static str {
        match self {
            BodyId::Stars => "stars",
            BodyId::Earth => "earth",
            BodyId::Moon => "moon",
            BodyId::Sun => "sun",
            BodyId::Mercury => "mercury",
            BodyId::Venus => "venus",
            BodyId::Mars => "mars",
            BodyId::Jupiter => "jupiter",
            BodyId::Saturn => "saturn",
            BodyId::Uranus => "uranus",
            BodyId::Neptune => "neptune",
            BodyId::SaturnRing => "saturn_ring",
        }
    }

    /// Image file under the texture directory.
    pub fn texture_file(self) -> &'static str {
        match self {
            BodyId::Stars => "stars_milky_way.jpg",
            BodyId::Earth => "earth.jpg",
            BodyId::Moon => "moon.jpg",
            BodyId::Sun => "sun.jpg",
            BodyId::Mercury => "mercury.jpg",
            BodyId::Venus => "venus.jpg",
            BodyId::Mars => "mars.jpg",
            BodyId::Jupiter => "jupiter.jpg",
            BodyId::Saturn => "saturn.jpg",
            BodyId::Uranus => "uranus.jpg",
            BodyId::Neptune => "neptune.jpg",
            BodyId::SaturnRing => "saturn_rings.jpg",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A circular orbit around the parent. `angle` grows without bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub distance: f32,
    pub speed: f32,
    pub angle: f32,
}

impl Orbit {
    pub const fn new(distance: f32, speed: f32) -> Self {
        Self {
            distance,
            speed,
            angle: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.angle += self.speed * dt;
    }
}

/// Where a body sits relative to the camera frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// The starfield sphere, mirrored so its texture faces inward.
    Backdrop,
    /// At the origin of the camera frame.
    Center,
    /// On an orbit around `parent`, or around the origin when `None`.
    Orbiting { parent: Option<BodyId>, orbit: Orbit },
    /// Shares the transform of another body.
    Attached(BodyId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeshKind {
    Sphere {
        lat_bands: u32,
        long_bands: u32,
        radius: f32,
    },
    Ring {
        inner: f32,
        outer: f32,
        segments: u32,
    },
}

impl MeshKind {
    pub fn build(&self) -> Result<MeshData, MeshError> {
        match *self {
            MeshKind::Sphere {
                lat_bands,
                long_bands,
                radius,
            } => orrery_mesh::sphere(lat_bands, long_bands, radius),
            MeshKind::Ring {
                inner,
                outer,
                segments,
            } => orrery_mesh::ring(inner, outer, segments),
        }
    }
}

/// When a body is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Always,
    /// Only once the camera is past the declutter threshold.
    ZoomedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    pub id: BodyId,
    pub placement: Placement,
    pub mesh: MeshKind,
    pub visibility: Visibility,
}

impl CelestialBody {
    pub fn orbit(&self) -> Option<&Orbit> {
        match &self.placement {
            Placement::Orbiting { orbit, .. } => Some(orbit),
            _ => None,
        }
    }

    pub fn orbit_mut(&mut self) -> Option<&mut Orbit> {
        match &mut self.placement {
            Placement::Orbiting { orbit, .. } => Some(orbit),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<BodyId> {
        match self.placement {
            Placement::Orbiting { parent, .. } => parent,
            Placement::Attached(parent) => Some(parent),
            Placement::Backdrop | Placement::Center => None,
        }
    }

    pub fn texture_file(&self) -> &'static str {
        self.id.texture_file()
    }
}

/// Fixed-size table of bodies indexed by [`BodyId`].
#[derive(Debug, Clone, PartialEq)]
pub struct BodyTable {
    bodies: Vec<CelestialBody>,
}

impl BodyTable {
    /// Build the table. Returns `None` unless every id appears exactly once.
    pub fn new(mut bodies: Vec<CelestialBody>) -> Option<Self> {
        bodies.sort_by_key(|b| b.id);
        let complete = bodies.len() == BodyId::COUNT
            && bodies.iter().zip(BodyId::ALL).all(|(b, id)| b.id == id);
        complete.then_some(Self { bodies })
    }

    /// Build from bodies already in [`BodyId::ALL`] order.
    pub(crate) fn from_ordered(bodies: Vec<CelestialBody>) -> Self {
        debug_assert!(bodies.iter().map(|b| b.id).eq(BodyId::ALL));
        Self { bodies }
    }

    pub fn get(&self, id: BodyId) -> &CelestialBody {
        &self.bodies[id.index()]
    }

    pub fn get_mut(&mut self, id: BodyId) -> &mut CelestialBody {
        &mut self.bodies[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CelestialBody> {
        self.bodies.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matches_discriminants() {
        for (i, id) in BodyId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_orbit_advances_unbounded() {
        let mut orbit = Orbit::new(9.5, 1.0);
        for _ in 0..10 {
            orbit.advance(1.0);
        }
        assert_eq!(orbit.angle, 10.0);
    }

    #[test]
    fn test_parent_lookup() {
        let moon = CelestialBody {
            id: BodyId::Moon,
            placement: Placement::Orbiting {
                parent: Some(BodyId::Earth),
                orbit: Orbit::new(2.0, 2.5),
            },
            mesh: MeshKind::Sphere {
                lat_bands: 20,
                long_bands: 20,
                radius: 0.3,
            },
            visibility: Visibility::Always,
        };
        assert_eq!(moon.parent(), Some(BodyId::Earth));
        assert_eq!(moon.orbit().map(|o| o.distance), Some(2.0));
    }

    #[test]
    fn test_table_rejects_missing_bodies() {
        assert!(BodyTable::new(Vec::new()).is_none());
    }

    #[test]
    fn test_mesh_kind_builds() {
        let ring = MeshKind::Ring {
            inner: 2.2,
            outer: 3.5,
            segments: 64,
        }
        .build()
        .unwrap();
        assert_eq!(ring.vertex_count(), 130);
        assert_eq!(ring.index_count(), 384);
    }
}
