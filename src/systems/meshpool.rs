//! Mesh pool systems.
//!
//! - [`reclaim_animator_meshes`] returns the private mesh of every object
//!   whose [`SpriteAnimator`] went away (component removed or entity
//!   despawned) to the [`MeshPool`].
//! - [`publish_pool_debug`] writes pool diagnostics into the `debug`
//!   property of entities marked with [`PoolProbe`].

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::meshbinding::MeshBinding;
use crate::components::poolprobe::PoolProbe;
use crate::components::properties::Properties;
use crate::components::spriteanimator::SpriteAnimator;
use crate::components::spriteconfig::PROP_DEBUG;
use crate::resources::meshpool::MeshPool;
use crate::resources::meshstore::MeshStore;

/// Give meshes of removed animators back to the pool.
///
/// If the object itself is still alive it goes back to showing its source
/// mesh.
pub fn reclaim_animator_meshes(
    mut removed: RemovedComponents<SpriteAnimator>,
    mut pool: ResMut<MeshPool>,
    mut bindings: Query<&mut MeshBinding>,
) {
    for entity in removed.read() {
        let Some(mesh) = pool.reclaim(entity) else {
            continue;
        };
        debug!("Reclaimed mesh {:?} from {:?}", mesh, entity);
        if let Ok(mut binding) = bindings.get_mut(entity)
            && binding.instance == Some(mesh)
        {
            binding.instance = None;
        }
    }
}

/// Publish `"<live instances> | {source: free, ...}"` on probe entities.
pub fn publish_pool_debug(
    pool: Res<MeshPool>,
    store: Res<MeshStore>,
    mut query: Query<&mut Properties, With<PoolProbe>>,
) {
    let text = format!("{} | {}", store.instance_count(), pool.summary());
    for mut props in query.iter_mut() {
        props.set(PROP_DEBUG, text.clone());
    }
}
