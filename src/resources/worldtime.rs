//! Simulation clock.
//!
//! Advanced once per host step by
//! [`update_world_time`](crate::systems::time::update_world_time). Frame
//! timers accumulate the scaled `delta`, so playback speed follows
//! `time_scale`.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Clone, Copy)]
pub struct WorldTime {
    /// Scaled seconds since the session started.
    pub elapsed: f32,
    /// Scaled seconds of the last step.
    pub delta: f32,
    pub time_scale: f32,
    /// Steps taken so far.
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}
