//! Sprite systems.
//!
//! Submodules overview
//! - [`animation`] – per-step entry point: build, configure and tick animators
//! - [`meshpool`] – return meshes of removed animators, publish pool diagnostics
//! - [`time`] – update simulation time and delta
//!
//! [`sprite_schedule`] wires them in the order the host must run them each
//! step.

use bevy_ecs::prelude::*;

pub mod animation;
pub mod meshpool;
pub mod time;

use animation::sprite_animation_system;
use meshpool::{publish_pool_debug, reclaim_animator_meshes};

/// Schedule running one sprite step.
///
/// Meshes of animators removed since the last step are reclaimed first so
/// that objects animated for the first time this step can reuse them.
pub fn sprite_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            reclaim_animator_meshes,
            sprite_animation_system,
            publish_pool_debug,
        )
            .chain(),
    );
    schedule
}
