//! Sprite animation system.
//!
//! [`sprite_animation_system`] is the per-step entry point the host runs for
//! every object carrying a [`SpriteController`]. Objects whose controller
//! isn't triggered this step only have their frame clock advanced.
//!
//! # Step Flow
//!
//! 1. On the object's first triggered step, build its [`SpriteAnimator`]:
//!    the cycles come from [`BakedCycles`] when present, otherwise from the
//!    grid convention (`xstep`/`total_frames`) applied to the source mesh's
//!    first polygon. A private mesh is leased from [`MeshPool`] and bound.
//!    Objects animated earlier count this step's [`WorldTime`] delta toward
//!    their next frame first, triggered or not.
//! 2. Apply this step's overrides from [`Properties`]: `animation`, `fps`,
//!    `reversed`, `xflipped`/`yflipped`.
//! 3. Publish the cursor index as the `current_frame` property.
//! 4. Tick the animator.
//! 5. If the cycle wrapped, clear the flag and trigger one
//!    [`ActuatorActivated`] per controller actuator.
//!
//! Overrides are always applied before the tick, and the end-of-cycle
//! signal is consumed in the same step it is raised.

use bevy_ecs::prelude::*;
use log::{error, info};

use crate::components::animationset::AnimationSet;
use crate::components::bakedcycles::BakedCycles;
use crate::components::meshbinding::MeshBinding;
use crate::components::polygonuv::PolygonUv;
use crate::components::properties::Properties;
use crate::components::spriteanimator::{AnimatorError, SpriteAnimator};
use crate::components::spriteconfig::{GridConfig, PROP_CURRENT_FRAME, SpriteConfig};
use crate::components::spritecontroller::SpriteController;
use crate::events::actuator::ActuatorActivated;
use crate::resources::meshpool::MeshPool;
use crate::resources::meshstore::MeshStore;
use crate::resources::worldtime::WorldTime;

/// Polygon of the sprite mesh whose UVs are animated.
pub const SPRITE_POLYGON: usize = 0;

/// Drive every triggered sprite object one step.
///
/// Contract
/// - Reads [`WorldTime`] for the step delta.
/// - Creates missing [`SpriteAnimator`] components (deferred insert; the new
///   animator is still ticked this step).
/// - Mutates [`Properties`] (`current_frame`), [`MeshBinding`] and mesh UVs
///   in [`MeshStore`].
/// - Triggers [`ActuatorActivated`] on cycle completion.
#[allow(clippy::type_complexity)]
pub fn sprite_animation_system(
    mut query: Query<(
        Entity,
        &SpriteController,
        &mut Properties,
        &mut MeshBinding,
        Option<&mut SpriteAnimator>,
        Option<&BakedCycles>,
    )>,
    mut store: ResMut<MeshStore>,
    mut pool: ResMut<MeshPool>,
    time: Res<WorldTime>,
    mut commands: Commands,
) {
    let dt = time.delta;

    for (entity, controller, mut props, mut binding, mut maybe_animator, baked) in query.iter_mut() {
        // The frame clock runs whether or not the controller fires.
        if let Some(animator) = maybe_animator.as_mut() {
            animator.advance(dt);
        }
        if !controller.is_triggered() {
            continue;
        }

        let config = SpriteConfig::resolve(&props);

        let mut created = None;
        let animator = match maybe_animator {
            Some(animator) => animator.into_inner(),
            None => {
                match build_animator(
                    entity,
                    &props,
                    &config,
                    &mut binding,
                    baked,
                    &mut store,
                    &mut pool,
                ) {
                    Ok(animator) => created.insert(animator),
                    Err(e) => {
                        error!("Failed to create sprite animator for {:?}: {}", entity, e);
                        continue;
                    }
                }
            }
        };

        if let Some(name) = config.animation.as_deref() {
            animator.cycle(name, &mut store);
        }
        if let Some(fps) = config.fps {
            animator.set_fps(fps);
        }
        if let Some(direction) = config.direction() {
            animator.set_direction(direction);
        }
        animator.set_uv_transform(config.uv_transform(animator.uv_transform()));

        props.set(PROP_CURRENT_FRAME, animator.current_index());

        animator.tick(&mut store);

        if animator.take_at_end() {
            for actuator in &controller.actuators {
                commands.trigger(ActuatorActivated {
                    entity,
                    actuator: actuator.clone(),
                    cycle: animator.active_cycle().to_string(),
                });
            }
        }

        if let Some(animator) = created {
            commands.entity(entity).insert(animator);
        }
    }
}

/// Build the animator for an object seen for the first time.
///
/// On failure any mesh leased along the way is returned to the pool.
fn build_animator(
    entity: Entity,
    props: &Properties,
    config: &SpriteConfig,
    binding: &mut MeshBinding,
    baked: Option<&BakedCycles>,
    store: &mut MeshStore,
    pool: &mut MeshPool,
) -> Result<SpriteAnimator, AnimatorError> {
    let set = match baked {
        Some(BakedCycles(text)) => AnimationSet::from_json(text)?,
        None => {
            let grid = GridConfig::resolve(props);
            let base = store
                .source(&binding.source)?
                .polygon(SPRITE_POLYGON)?
                .uvs
                .clone();
            AnimationSet::from_grid(&base, grid.xstep, grid.total_frames)?
        }
    };

    let mesh = pool.lease(entity, store, &binding.source)?;
    let animator = PolygonUv::new(store, mesh, SPRITE_POLYGON)
        .map_err(AnimatorError::from)
        .and_then(|polygon| {
            SpriteAnimator::new(set, polygon, config.animation.as_deref(), store)
        });

    match animator {
        Ok(animator) => {
            binding.replace_mesh(mesh);
            info!(
                "Sprite animator for {:?} on '{}' ({:?}), cycle '{}'",
                entity,
                binding.source,
                mesh,
                animator.active_cycle()
            );
            Ok(animator)
        }
        Err(e) => {
            pool.reclaim(entity);
            Err(e)
        }
    }
}
