//! Reuse pool for duplicated sprite meshes.
//!
//! Every animated object needs a private copy of its mesh so UV writes don't
//! leak into other objects sharing the source. Freeing those copies in the
//! host is unreliable, so they are never freed: when an animator goes away
//! its mesh goes back on a free list keyed by the source mesh name, and the
//! next animator using the same source picks it up.
//!
//! Free lists are unbounded. A list is discarded wholesale when the mesh
//! popped from it belongs to a scene that is no longer valid.
//!
//! The pool also tracks which entity holds which mesh (its lease), so that
//! [`reclaim_animator_meshes`](crate::systems::meshpool::reclaim_animator_meshes)
//! can return meshes of despawned objects without access to their
//! components.

use bevy_ecs::prelude::{Entity, Resource};
use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::resources::meshstore::{MeshError, MeshHandle, MeshStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lease {
    pub source: String,
    pub mesh: MeshHandle,
}

#[derive(Resource, Debug, Default)]
pub struct MeshPool {
    free: FxHashMap<String, Vec<MeshHandle>>,
    leases: FxHashMap<Entity, Lease>,
}

impl MeshPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a free mesh for `source`, or duplicate a new one.
    pub fn acquire(&mut self, store: &mut MeshStore, source: &str) -> Result<MeshHandle, MeshError> {
        if let Some(meshes) = self.free.get_mut(source)
            && let Some(mesh) = meshes.pop()
        {
            if store.is_valid(mesh) {
                debug!("Reusing pooled mesh {:?} for '{}'", mesh, source);
                return Ok(mesh);
            }
            info!(
                "Discarding {} stale pooled meshes for '{}'",
                meshes.len() + 1,
                source
            );
            meshes.clear();
        }
        store.duplicate(source)
    }

    /// Put `mesh` back on the free list for `source`.
    pub fn release(&mut self, source: impl Into<String>, mesh: MeshHandle) {
        let source = source.into();
        debug!("Mesh {:?} returned to pool '{}'", mesh, source);
        self.free.entry(source).or_default().push(mesh);
    }

    /// Acquire a mesh on behalf of `entity` and remember the lease.
    pub fn lease(
        &mut self,
        entity: Entity,
        store: &mut MeshStore,
        source: &str,
    ) -> Result<MeshHandle, MeshError> {
        if let Some(previous) = self.leases.remove(&entity) {
            self.release(previous.source, previous.mesh);
        }
        let mesh = self.acquire(store, source)?;
        self.leases.insert(
            entity,
            Lease {
                source: source.to_string(),
                mesh,
            },
        );
        Ok(mesh)
    }

    /// Return the mesh leased by `entity`, if any, to its free list.
    pub fn reclaim(&mut self, entity: Entity) -> Option<MeshHandle> {
        let lease = self.leases.remove(&entity)?;
        self.release(lease.source, lease.mesh);
        Some(lease.mesh)
    }

    pub fn lease_of(&self, entity: Entity) -> Option<&Lease> {
        self.leases.get(&entity)
    }

    pub fn free_count(&self, source: &str) -> usize {
        self.free.get(source).map_or(0, Vec::len)
    }

    pub fn lease_count(&self) -> usize {
        self.leases.len()
    }

    /// Free list sizes as `{key: n, ...}`, keys sorted.
    pub fn summary(&self) -> String {
        let mut entries: Vec<_> = self.free.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        entries.sort_unstable();
        let body = entries
            .iter()
            .map(|(k, n)| format!("{k}: {n}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{body}}}")
    }

    /// Forget every free mesh and lease. Call when the host session ends.
    pub fn clear(&mut self) {
        self.free.clear();
        self.leases.clear();
    }
}
