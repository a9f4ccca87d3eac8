//! Pool diagnostics marker component.
//!
//! Entities with [`PoolProbe`] and [`Properties`](crate::components::properties::Properties)
//! get a `debug` property describing the mesh pool, refreshed every step by
//! [`publish_pool_debug`](crate::systems::meshpool::publish_pool_debug).

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Debug)]
pub struct PoolProbe;
