//! Sprycle: sprite-sheet UV animation for 3D quads.
//!
//! Animates a sprite on a 3D quad by rewriting the texture coordinates of
//! one polygon each step. This module exposes the ECS components,
//! resources, systems and events for hosts and integration tests.

pub mod components;
pub mod events;
pub mod resources;
pub mod systems;
