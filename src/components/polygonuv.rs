//! Texture-coordinate view of one polygon of a mesh instance.

use glam::Vec2;

use crate::components::animationset::Frame;
use crate::resources::meshstore::{MeshError, MeshHandle, MeshStore};

/// Addresses a polygon of a duplicated mesh so its vertex UVs can be read and
/// written as a flat list in vertex order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolygonUv {
    pub mesh: MeshHandle,
    pub polygon: usize,
}

impl PolygonUv {
    /// Bind to `polygon` of `mesh`, failing if either does not exist.
    pub fn new(store: &MeshStore, mesh: MeshHandle, polygon: usize) -> Result<Self, MeshError> {
        store.instance(mesh)?.polygon(polygon)?;
        Ok(PolygonUv { mesh, polygon })
    }

    pub fn vertex_count(&self, store: &MeshStore) -> Result<usize, MeshError> {
        Ok(store.instance(self.mesh)?.polygon(self.polygon)?.uvs.len())
    }

    pub fn tex_coords(&self, store: &MeshStore) -> Result<Frame, MeshError> {
        Ok(store.instance(self.mesh)?.polygon(self.polygon)?.uvs.clone())
    }

    /// Write all coordinates in a single pass over the vertices.
    pub fn set_tex_coords(&self, store: &mut MeshStore, coords: &[Vec2]) -> Result<(), MeshError> {
        store
            .instance_mut(self.mesh)?
            .polygon_mut(self.polygon)?
            .write_uvs(coords);
        Ok(())
    }
}
