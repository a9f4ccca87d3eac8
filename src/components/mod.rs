//! ECS components for sprite objects.
//!
//! Submodules overview:
//! - [`animationset`] – named UV cycles and their validation
//! - [`bakedcycles`] – exporter-produced cycle data attached to an object
//! - [`cyclecursor`] – position and direction within the active cycle
//! - [`meshbinding`] – source mesh and bound private instance of an object
//! - [`polygonuv`] – read/write view of one polygon's texture coordinates
//! - [`poolprobe`] – marker for entities that receive pool diagnostics
//! - [`properties`] – loosely typed per-object property bag
//! - [`spriteanimator`] – per-object UV animator
//! - [`spriteconfig`] – playback and grid configuration read from properties
//! - [`spritecontroller`] – sensor/actuator logic brick gating the animation
//! - [`timer`] – fixed-interval frame gate

pub mod animationset;
pub mod bakedcycles;
pub mod cyclecursor;
pub mod meshbinding;
pub mod polygonuv;
pub mod poolprobe;
pub mod properties;
pub mod spriteanimator;
pub mod spriteconfig;
pub mod spritecontroller;
pub mod timer;
