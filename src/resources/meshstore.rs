//! Host mesh library.
//!
//! Holds the named source meshes loaded with the scene and the duplicated
//! instances created from them at runtime. Duplicates belong to the scene
//! that was current when they were made; [`MeshStore::invalidate_scene`]
//! models a scene reload, which drops every instance of the old scene and
//! makes their handles report as invalid.

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use log::{debug, info};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;

/// Opaque reference to a duplicated mesh instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("no source mesh named '{0}'")]
    UnknownSource(String),
    #[error("mesh instance {0:?} does not exist")]
    UnknownInstance(MeshHandle),
    #[error("mesh has no polygon {0}")]
    NoPolygon(usize),
}

/// One polygon: vertex UVs in vertex order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub uvs: SmallVec<[Vec2; 4]>,
}

impl Polygon {
    pub fn new(uvs: impl IntoIterator<Item = Vec2>) -> Self {
        Polygon {
            uvs: uvs.into_iter().collect(),
        }
    }

    /// Overwrite UVs in vertex order. Extra coordinates are ignored and
    /// missing ones leave the vertex untouched.
    pub fn write_uvs(&mut self, coords: &[Vec2]) {
        for (slot, uv) in self.uvs.iter_mut().zip(coords) {
            *slot = *uv;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub polygons: Vec<Polygon>,
}

impl MeshData {
    /// Single quad whose UVs cover `min..max`, counter-clockwise from the
    /// bottom-left corner.
    pub fn quad(min: Vec2, max: Vec2) -> Self {
        MeshData {
            polygons: vec![Polygon::new([
                Vec2::new(min.x, min.y),
                Vec2::new(max.x, min.y),
                Vec2::new(max.x, max.y),
                Vec2::new(min.x, max.y),
            ])],
        }
    }

    pub fn polygon(&self, index: usize) -> Result<&Polygon, MeshError> {
        self.polygons.get(index).ok_or(MeshError::NoPolygon(index))
    }

    pub fn polygon_mut(&mut self, index: usize) -> Result<&mut Polygon, MeshError> {
        self.polygons.get_mut(index).ok_or(MeshError::NoPolygon(index))
    }
}

#[derive(Debug, Clone)]
struct MeshInstance {
    source: String,
    scene: u32,
    data: MeshData,
}

#[derive(Resource, Debug, Default)]
pub struct MeshStore {
    sources: FxHashMap<String, MeshData>,
    instances: FxHashMap<MeshHandle, MeshInstance>,
    next_handle: u64,
    scene: u32,
    allocations: u64,
}

impl MeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, name: impl Into<String>, data: MeshData) -> Self {
        self.insert_source(name, data);
        self
    }

    pub fn insert_source(&mut self, name: impl Into<String>, data: MeshData) {
        self.sources.insert(name.into(), data);
    }

    pub fn source(&self, name: &str) -> Result<&MeshData, MeshError> {
        self.sources
            .get(name)
            .ok_or_else(|| MeshError::UnknownSource(name.to_string()))
    }

    /// Create an independent copy of a source mesh in the current scene.
    pub fn duplicate(&mut self, source: &str) -> Result<MeshHandle, MeshError> {
        let data = self.source(source)?.clone();
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;
        self.allocations += 1;
        self.instances.insert(
            handle,
            MeshInstance {
                source: source.to_string(),
                scene: self.scene,
                data,
            },
        );
        info!("Duplicated mesh '{}' as {:?}", source, handle);
        Ok(handle)
    }

    pub fn instance(&self, handle: MeshHandle) -> Result<&MeshData, MeshError> {
        self.instances
            .get(&handle)
            .map(|i| &i.data)
            .ok_or(MeshError::UnknownInstance(handle))
    }

    pub fn instance_mut(&mut self, handle: MeshHandle) -> Result<&mut MeshData, MeshError> {
        self.instances
            .get_mut(&handle)
            .map(|i| &mut i.data)
            .ok_or(MeshError::UnknownInstance(handle))
    }

    pub fn instance_source(&self, handle: MeshHandle) -> Option<&str> {
        self.instances.get(&handle).map(|i| i.source.as_str())
    }

    /// Whether the instance's owning scene is still alive.
    pub fn is_valid(&self, handle: MeshHandle) -> bool {
        self.instances
            .get(&handle)
            .is_some_and(|i| i.scene == self.scene)
    }

    /// End the current scene. Instances created so far are released by the
    /// host and their handles become invalid.
    pub fn invalidate_scene(&mut self) {
        let scene = self.scene;
        self.instances.retain(|_, i| i.scene != scene);
        self.scene = self.scene.wrapping_add(1);
        debug!("Scene {} invalidated, now {}", scene, self.scene);
    }

    /// Number of live duplicated instances.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Total duplicates ever made.
    pub fn allocations(&self) -> u64 {
        self.allocations
    }
}
