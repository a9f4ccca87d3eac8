//! Actuator activation events.
//!
//! When an animated object finishes a pass through its active cycle, the
//! [`sprite_animation_system`](crate::systems::animation::sprite_animation_system)
//! triggers one [`ActuatorActivated`] per actuator on the object's
//! [`SpriteController`](crate::components::spritecontroller::SpriteController).
//! The host subscribes with an observer and performs the actual dispatch.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<ActuatorActivated>| {
//!     let event = trigger.event();
//!     match event.actuator.as_str() {
//!         "play_sound" => { /* ... */ }
//!         _ => {}
//!     }
//! });
//! ```

use bevy_ecs::prelude::*;

/// Request to fire one actuator of an object.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ActuatorActivated {
    /// The animated object.
    pub entity: Entity,
    /// Actuator name as listed on the controller.
    pub actuator: String,
    /// Cycle that just completed.
    pub cycle: String,
}
