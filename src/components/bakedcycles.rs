//! Baked animation data attached to an object.
//!
//! Produced by the authoring tool's exporter. The text is parsed with
//! [`AnimationSet::from_json`](crate::components::animationset::AnimationSet::from_json)
//! the first time the object is animated and not touched afterwards.

use bevy_ecs::prelude::Component;

#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct BakedCycles(pub String);
