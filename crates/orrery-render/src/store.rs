//! Keyed GPU resources shared by every frame.
//!
//! Meshes, orbit loops and texture slots are created once at startup and
//! live until the application exits.

use std::collections::HashMap;

use orrery_mesh::{MeshData, OrbitLoop};

use crate::buffer::{BufferAllocator, LineLoop, TexturedMesh};
use crate::texture::TextureStore;

pub struct ResourceStore {
    meshes: HashMap<String, TexturedMesh>,
    orbits: HashMap<String, LineLoop>,
    textures: TextureStore,
}

impl ResourceStore {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            meshes: HashMap::new(),
            orbits: HashMap::new(),
            textures: TextureStore::new(device),
        }
    }

    /// Upload `mesh` under `key`. A key that is already present keeps its
    /// original buffers.
    pub fn insert_mesh(
        &mut self,
        device: &wgpu::Device,
        key: &str,
        mesh: &MeshData,
    ) -> &TexturedMesh {
        self.meshes.entry(key.to_string()).or_insert_with(|| {
            log::debug!(
                "Uploading mesh '{key}' ({} vertices, {} indices)",
                mesh.vertex_count(),
                mesh.index_count()
            );
            BufferAllocator::new(device).create_textured_mesh(key, mesh)
        })
    }

    /// Upload an orbit path under `key`, keeping any existing entry.
    pub fn insert_orbit(
        &mut self,
        device: &wgpu::Device,
        key: &str,
        orbit: &OrbitLoop,
    ) -> &LineLoop {
        self.orbits
            .entry(key.to_string())
            .or_insert_with(|| BufferAllocator::new(device).create_line_loop(key, orbit))
    }

    pub fn mesh(&self, key: &str) -> Option<&TexturedMesh> {
        self.meshes.get(key)
    }

    pub fn orbit(&self, key: &str) -> Option<&LineLoop> {
        self.orbits.get(key)
    }

    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureStore {
        &mut self.textures
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn orbit_count(&self) -> usize {
        self.orbits.len()
    }
}
