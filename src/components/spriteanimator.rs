//! Per-object UV animator.
//!
//! A [`SpriteAnimator`] drives one polygon of an object's private mesh copy
//! through the frames of its [`AnimationSet`]. Each frame is passed through
//! the animator's `uv_transform` around the frame's own centroid before it is
//! written, which is how mirroring is done without separate flipped frames.
//!
//! # Lifecycle
//!
//! 1. Created on the object's first triggered step by
//!    [`sprite_animation_system`](crate::systems::animation::sprite_animation_system),
//!    with a mesh leased from [`MeshPool`](crate::resources::meshpool::MeshPool).
//! 2. Its clock advances by the step delta every step; ticked every
//!    triggered step, showing at most one new frame per timer interval.
//! 3. When the component is removed or the object despawned,
//!    [`reclaim_animator_meshes`](crate::systems::meshpool::reclaim_animator_meshes)
//!    returns the mesh to the pool.

use bevy_ecs::prelude::Component;
use glam::{Mat2, Vec2};
use log::{debug, warn};
use thiserror::Error;

use crate::components::animationset::{AnimationDataError, AnimationSet, Frame};
use crate::components::cyclecursor::{CycleCursor, Direction};
use crate::components::polygonuv::PolygonUv;
use crate::components::timer::FrameTimer;
use crate::resources::meshstore::{MeshError, MeshStore};

/// Frame rate used until the object sets one.
pub const DEFAULT_FPS: f32 = 100.0;

#[derive(Debug, Error, PartialEq)]
pub enum AnimatorError {
    #[error(transparent)]
    Data(#[from] AnimationDataError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

#[derive(Component, Debug, Clone)]
pub struct SpriteAnimator {
    set: AnimationSet,
    cursor: CycleCursor,
    timer: FrameTimer,
    fps: f32,
    uv_transform: Mat2,
    polygon: PolygonUv,
}

impl SpriteAnimator {
    /// Bind `set` to `polygon` and show the first frame of `initial` (or of
    /// the first cycle when `initial` is unknown or absent).
    pub fn new(
        set: AnimationSet,
        polygon: PolygonUv,
        initial: Option<&str>,
        store: &mut MeshStore,
    ) -> Result<Self, AnimatorError> {
        set.validate_vertex_count(polygon.vertex_count(store)?)?;

        let initial = set.resolve(initial.unwrap_or_default()).name.clone();
        let mut cursor = CycleCursor::new(set.first());
        // Cleared so the first `cycle` call below is never a no-op.
        cursor.name.clear();

        let mut animator = SpriteAnimator {
            set,
            cursor,
            timer: FrameTimer::new(FrameTimer::interval_for_fps(DEFAULT_FPS)),
            fps: DEFAULT_FPS,
            uv_transform: Mat2::IDENTITY,
            polygon,
        };
        animator.cycle(&initial, store);
        Ok(animator)
    }

    /// Switch to cycle `name` and show its first frame right away.
    ///
    /// Does nothing if `name` is already active. Unknown names fall back to
    /// the first cycle.
    pub fn cycle(&mut self, name: &str, store: &mut MeshStore) {
        let cycle = match self.set.get(name) {
            Some(cycle) => cycle,
            None => {
                let fallback = self.set.first();
                if fallback.name != self.cursor.name {
                    warn!("Unknown cycle '{}', using '{}'", name, fallback.name);
                }
                fallback
            }
        };
        if cycle.name == self.cursor.name {
            return;
        }

        self.cursor.switch_to(cycle);
        self.timer.restart();
        self.show_next_frame(store);
    }

    /// Count `dt` seconds of world time toward the next frame.
    pub fn advance(&mut self, dt: f32) {
        self.timer.advance(dt);
    }

    /// Advance one frame if the frame interval has elapsed.
    pub fn tick(&mut self, store: &mut MeshStore) {
        if self.timer.done() {
            self.show_next_frame(store);
        }
    }

    /// Write the cursor's frame to the polygon and step the cursor.
    pub fn show_next_frame(&mut self, store: &mut MeshStore) {
        let frame = self.cursor.next_frame().clone();
        let transformed = self.flip_transform(&frame);
        debug!(
            "Cycle '{}' -> frame index {}",
            self.cursor.name,
            self.cursor.index()
        );
        if let Err(e) = self.polygon.set_tex_coords(store, &transformed) {
            warn!("Failed to write UVs for cycle '{}': {}", self.cursor.name, e);
        }
    }

    /// Apply `uv_transform` to `frame` about the frame's centroid (the mean
    /// of its points).
    pub fn flip_transform(&self, frame: &[Vec2]) -> Frame {
        if frame.is_empty() {
            return Frame::new();
        }
        let center = frame.iter().copied().sum::<Vec2>() / frame.len() as f32;
        frame
            .iter()
            .map(|uv| self.uv_transform * (*uv - center) + center)
            .collect()
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Set the frame rate. The sign is ignored; zero freezes playback.
    pub fn set_fps(&mut self, fps: f32) {
        self.timer.set_fps(fps);
        self.fps = fps;
    }

    pub fn uv_transform(&self) -> Mat2 {
        self.uv_transform
    }

    pub fn set_uv_transform(&mut self, transform: Mat2) {
        self.uv_transform = transform;
    }

    pub fn direction(&self) -> Direction {
        self.cursor.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.cursor.direction = direction;
    }

    pub fn active_cycle(&self) -> &str {
        &self.cursor.name
    }

    /// Index of the frame the next advance will show.
    pub fn current_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    pub fn polygon(&self) -> PolygonUv {
        self.polygon
    }

    /// Read and clear the end-of-cycle flag.
    pub fn take_at_end(&mut self) -> bool {
        self.cursor.take_at_end()
    }
}
