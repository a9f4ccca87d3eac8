//! Sprite tick integration tests: animator creation, playback overrides,
//! actuator events and mesh pooling, driven through the sprite schedule.

use std::sync::{Arc, Mutex};

use bevy_ecs::prelude::*;
use glam::Vec2;

use sprycle::components::bakedcycles::BakedCycles;
use sprycle::components::meshbinding::MeshBinding;
use sprycle::components::poolprobe::PoolProbe;
use sprycle::components::properties::Properties;
use sprycle::components::spriteanimator::SpriteAnimator;
use sprycle::components::spriteconfig::{
    PROP_ANIMATION, PROP_CURRENT_FRAME, PROP_DEBUG, PROP_FPS, PROP_REVERSED, PROP_TOTAL_FRAMES,
    PROP_XFLIPPED, PROP_XSTEP,
};
use sprycle::components::spritecontroller::SpriteController;
use sprycle::events::actuator::ActuatorActivated;
use sprycle::resources::meshpool::MeshPool;
use sprycle::resources::meshstore::{MeshData, MeshStore};
use sprycle::resources::worldtime::WorldTime;
use sprycle::systems::animation::SPRITE_POLYGON;
use sprycle::systems::sprite_schedule;
use sprycle::systems::time::update_world_time;

const EPSILON: f32 = 1e-5;
const DT: f32 = 0.06;
const SOURCE: &str = "Sprite";

fn approx_eq(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < EPSILON
}

fn quad(x: f32, y: f32) -> [[f32; 2]; 4] {
    [[x, y], [x + 0.25, y], [x + 0.25, y + 0.25], [x, y + 0.25]]
}

/// Baked data: `walk` with four frames along the bottom row, `idle` with
/// one frame above it.
fn baked_walk_idle() -> String {
    let walk: Vec<_> = (0..4).map(|i| quad(0.25 * i as f32, 0.0)).collect();
    serde_json::json!([
        { "name": "walk", "frames": walk },
        { "name": "idle", "frames": [quad(0.0, 0.25)] },
    ])
    .to_string()
}

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(
        MeshStore::new().with_source(
            SOURCE,
            MeshData::quad(Vec2::new(0.0, 0.75), Vec2::new(0.25, 1.0)),
        ),
    );
    world.insert_resource(MeshPool::new());
    world
}

fn record_actuators(world: &mut World) -> Arc<Mutex<Vec<ActuatorActivated>>> {
    let fired = Arc::new(Mutex::new(Vec::new()));
    let fired_clone = fired.clone();
    world.add_observer(move |trigger: On<ActuatorActivated>| {
        fired_clone.lock().unwrap().push(trigger.event().clone());
    });
    world.flush();
    fired
}

fn step(world: &mut World, schedule: &mut Schedule) {
    step_by(world, schedule, DT);
}

fn step_by(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
    world.clear_trackers();
}

fn spawn_sprite(world: &mut World, controller: SpriteController, props: Properties) -> Entity {
    world
        .spawn((controller, props, MeshBinding::new(SOURCE)))
        .id()
}

fn spawn_baked(world: &mut World, props: Properties) -> Entity {
    let entity = spawn_sprite(world, SpriteController::new("anim"), props);
    world
        .entity_mut(entity)
        .insert(BakedCycles(baked_walk_idle()));
    entity
}

fn shown_uvs(world: &World, entity: Entity) -> Vec<Vec2> {
    let mesh = world
        .get::<MeshBinding>(entity)
        .unwrap()
        .instance
        .expect("object has no private mesh");
    world
        .resource::<MeshStore>()
        .instance(mesh)
        .unwrap()
        .polygon(SPRITE_POLYGON)
        .unwrap()
        .uvs
        .to_vec()
}

fn shows(world: &World, entity: Entity, expected: [[f32; 2]; 4]) -> bool {
    shown_uvs(world, entity)
        .iter()
        .zip(expected)
        .all(|(uv, e)| approx_eq(*uv, Vec2::from(e)))
}

#[test]
fn cycle_completion_fires_every_actuator_once() {
    let mut world = make_world();
    let fired = record_actuators(&mut world);
    let mut schedule = sprite_schedule();

    let controller = SpriteController::new("anim")
        .with_actuator("sound")
        .with_actuator("counter");
    let entity = spawn_sprite(
        &mut world,
        controller,
        Properties::default()
            .with(PROP_ANIMATION, "walk")
            .with(PROP_FPS, 10),
    );
    world
        .entity_mut(entity)
        .insert(BakedCycles(baked_walk_idle()));

    // Frame 0 on creation, then one frame every other step.
    for _ in 0..6 {
        step(&mut world, &mut schedule);
    }
    assert!(fired.lock().unwrap().is_empty());
    assert!(shows(&world, entity, quad(0.5, 0.0)));

    step(&mut world, &mut schedule);
    assert!(shows(&world, entity, quad(0.75, 0.0)));
    {
        let fired = fired.lock().unwrap();
        assert_eq!(fired.len(), 2);
        assert!(fired.iter().all(|e| e.entity == entity && e.cycle == "walk"));
        assert_eq!(fired[0].actuator, "sound");
        assert_eq!(fired[1].actuator, "counter");
    }

    for _ in 0..9 {
        step(&mut world, &mut schedule);
    }
    assert_eq!(fired.lock().unwrap().len(), 4);
}

#[test]
fn step_equal_to_frame_interval_advances_every_step() {
    let mut world = make_world();
    let fired = record_actuators(&mut world);
    let mut schedule = sprite_schedule();
    let entity = spawn_sprite(
        &mut world,
        SpriteController::new("anim").with_actuator("done"),
        Properties::default()
            .with(PROP_ANIMATION, "walk")
            .with(PROP_FPS, 10),
    );
    world
        .entity_mut(entity)
        .insert(BakedCycles(baked_walk_idle()));

    // Frame 0 on creation, then one frame per 0.1 s step; the cycle
    // completes on every 4th step.
    for n in 1..=400usize {
        step_by(&mut world, &mut schedule, 0.1);
        let frame = (n - 1) % 4;
        assert!(
            shows(&world, entity, quad(0.25 * frame as f32, 0.0)),
            "step {n} should show frame {frame}"
        );
        assert_eq!(fired.lock().unwrap().len(), n / 4, "after step {n}");
    }
}

#[test]
fn frame_clock_runs_while_untriggered() {
    let mut world = make_world();
    let mut schedule = sprite_schedule();
    let entity = spawn_sprite(
        &mut world,
        SpriteController::new("anim").with_sensor("go", true),
        Properties::default().with(PROP_FPS, 10),
    );
    world
        .entity_mut(entity)
        .insert(BakedCycles(baked_walk_idle()));
    step(&mut world, &mut schedule);

    world
        .get_mut::<SpriteController>(entity)
        .unwrap()
        .set_sensor("go", false);
    step(&mut world, &mut schedule);
    assert!(shows(&world, entity, quad(0.0, 0.0)));

    // 0.12 s have passed since creation when the controller fires again.
    world
        .get_mut::<SpriteController>(entity)
        .unwrap()
        .set_sensor("go", true);
    step(&mut world, &mut schedule);
    assert!(shows(&world, entity, quad(0.25, 0.0)));
}

#[test]
fn animator_is_created_on_first_triggered_step() {
    let mut world = make_world();
    let mut schedule = sprite_schedule();
    let entity = spawn_baked(&mut world, Properties::default());

    assert!(world.get::<SpriteAnimator>(entity).is_none());
    step(&mut world, &mut schedule);

    let animator = world.get::<SpriteAnimator>(entity).unwrap();
    assert_eq!(animator.active_cycle(), "walk");
    assert!(shows(&world, entity, quad(0.0, 0.0)));

    // The source mesh is untouched.
    let source = world.resource::<MeshStore>().source(SOURCE).unwrap();
    assert!(approx_eq(source.polygons[0].uvs[0], Vec2::new(0.0, 0.75)));
}

#[test]
fn and_controller_waits_for_every_sensor() {
    let mut world = make_world();
    let mut schedule = sprite_schedule();
    let controller = SpriteController::new("anim")
        .with_sensor("always", true)
        .with_sensor("key", false);
    let entity = spawn_sprite(&mut world, controller, Properties::default());

    step(&mut world, &mut schedule);
    assert!(world.get::<SpriteAnimator>(entity).is_none());
    assert_eq!(world.get::<MeshBinding>(entity).unwrap().instance, None);

    world
        .get_mut::<SpriteController>(entity)
        .unwrap()
        .set_sensor("key", true);
    step(&mut world, &mut schedule);
    assert!(world.get::<SpriteAnimator>(entity).is_some());
}

#[test]
fn or_controller_needs_one_sensor() {
    let mut world = make_world();
    let mut schedule = sprite_schedule();
    let controller = SpriteController::new("animOR")
        .with_sensor("a", false)
        .with_sensor("b", true);
    let entity = spawn_sprite(&mut world, controller, Properties::default());

    step(&mut world, &mut schedule);
    assert!(world.get::<SpriteAnimator>(entity).is_some());
}

#[test]
fn grid_sheet_steps_through_cells_row_major() {
    let mut world = make_world();
    let fired = record_actuators(&mut world);
    let mut schedule = sprite_schedule();
    let entity = spawn_sprite(
        &mut world,
        SpriteController::new("anim").with_actuator("done"),
        Properties::default()
            .with(PROP_XSTEP, 3)
            .with(PROP_TOTAL_FRAMES, 7)
            .with(PROP_FPS, 1000),
    );

    // Step k shows cell k-1.
    step(&mut world, &mut schedule);
    assert_eq!(
        world.get::<SpriteAnimator>(entity).unwrap().active_cycle(),
        "offset"
    );
    assert!(shows(&world, entity, quad(0.0, 0.75)));

    for _ in 0..4 {
        step(&mut world, &mut schedule);
    }
    // Cell 4: second row, second column.
    assert!(shows(&world, entity, quad(0.25, 0.5)));

    step(&mut world, &mut schedule);
    assert!(fired.lock().unwrap().is_empty());
    step(&mut world, &mut schedule);
    // Cell 6: third row, first column; last of the cycle.
    assert!(shows(&world, entity, quad(0.0, 0.25)));
    assert_eq!(fired.lock().unwrap().len(), 1);

    step(&mut world, &mut schedule);
    assert!(shows(&world, entity, quad(0.0, 0.75)));
}

#[test]
fn animation_property_alone_keeps_the_grid() {
    let mut world = make_world();
    let mut schedule = sprite_schedule();
    let entity = spawn_sprite(
        &mut world,
        SpriteController::new("anim"),
        Properties::default().with(PROP_ANIMATION, "walk"),
    );

    step(&mut world, &mut schedule);
    assert_eq!(
        world.get::<SpriteAnimator>(entity).unwrap().active_cycle(),
        "offset"
    );
    assert!(shows(&world, entity, quad(0.0, 0.75)));
}

#[test]
fn reversed_playback_wraps_to_last_frame() {
    let mut world = make_world();
    let mut schedule = sprite_schedule();
    let entity = spawn_baked(
        &mut world,
        Properties::default()
            .with(PROP_FPS, 1000)
            .with(PROP_REVERSED, true),
    );

    // Frame 0 on creation, the direction applies from the next advance.
    step(&mut world, &mut schedule);
    assert!(shows(&world, entity, quad(0.0, 0.0)));
    step(&mut world, &mut schedule);
    assert!(shows(&world, entity, quad(0.25, 0.0)));
    step(&mut world, &mut schedule);
    assert!(shows(&world, entity, quad(0.0, 0.0)));
    step(&mut world, &mut schedule);
    assert!(shows(&world, entity, quad(0.75, 0.0)));
    step(&mut world, &mut schedule);
    assert!(shows(&world, entity, quad(0.5, 0.0)));
}

#[test]
fn xflip_mirrors_frames_in_place() {
    let mut world = make_world();
    let mut schedule = sprite_schedule();
    let entity = spawn_baked(
        &mut world,
        Properties::default()
            .with(PROP_FPS, 1000)
            .with(PROP_XFLIPPED, true),
    );

    step(&mut world, &mut schedule);
    step(&mut world, &mut schedule);
    assert!(shows(
        &world,
        entity,
        [[0.5, 0.0], [0.25, 0.0], [0.25, 0.25], [0.5, 0.25]]
    ));
}

#[test]
fn current_frame_is_published_before_the_advance() {
    let mut world = make_world();
    let mut schedule = sprite_schedule();
    let entity = spawn_baked(&mut world, Properties::default().with(PROP_FPS, 1000));

    let current = |world: &World| {
        world
            .get::<Properties>(entity)
            .unwrap()
            .get_int(PROP_CURRENT_FRAME)
    };

    step(&mut world, &mut schedule);
    assert_eq!(current(&world), Some(1));
    step(&mut world, &mut schedule);
    assert_eq!(current(&world), Some(1));
    step(&mut world, &mut schedule);
    assert_eq!(current(&world), Some(2));
}

#[test]
fn animation_property_switches_cycle_immediately() {
    let mut world = make_world();
    let mut schedule = sprite_schedule();
    let entity = spawn_baked(
        &mut world,
        Properties::default()
            .with(PROP_ANIMATION, "walk")
            .with(PROP_FPS, 0),
    );

    step(&mut world, &mut schedule);
    world
        .get_mut::<Properties>(entity)
        .unwrap()
        .set(PROP_ANIMATION, "idle");
    step(&mut world, &mut schedule);

    assert_eq!(
        world.get::<SpriteAnimator>(entity).unwrap().active_cycle(),
        "idle"
    );
    assert!(shows(&world, entity, quad(0.0, 0.25)));

    // Unknown names fall back to the first cycle.
    world
        .get_mut::<Properties>(entity)
        .unwrap()
        .set(PROP_ANIMATION, "swim");
    step(&mut world, &mut schedule);
    assert_eq!(
        world.get::<SpriteAnimator>(entity).unwrap().active_cycle(),
        "walk"
    );
}

#[test]
fn despawned_object_mesh_is_reused() {
    let mut world = make_world();
    let mut schedule = sprite_schedule();

    let first = spawn_baked(&mut world, Properties::default());
    step(&mut world, &mut schedule);
    let mesh = world.get::<MeshBinding>(first).unwrap().instance.unwrap();

    world.despawn(first);
    let second = spawn_baked(&mut world, Properties::default());
    step(&mut world, &mut schedule);

    assert_eq!(
        world.get::<MeshBinding>(second).unwrap().instance,
        Some(mesh)
    );
    assert_eq!(world.resource::<MeshStore>().allocations(), 1);
    assert_eq!(world.resource::<MeshPool>().free_count(SOURCE), 0);
}

#[test]
fn removed_animator_returns_object_to_source_mesh() {
    let mut world = make_world();
    let mut schedule = sprite_schedule();
    let entity = spawn_sprite(
        &mut world,
        SpriteController::new("anim").with_sensor("go", true),
        Properties::default(),
    );
    step(&mut world, &mut schedule);
    assert!(world.get::<MeshBinding>(entity).unwrap().instance.is_some());

    world
        .get_mut::<SpriteController>(entity)
        .unwrap()
        .set_sensor("go", false);
    world.entity_mut(entity).remove::<SpriteAnimator>();
    step(&mut world, &mut schedule);

    assert_eq!(world.get::<MeshBinding>(entity).unwrap().instance, None);
    let pool = world.resource::<MeshPool>();
    assert_eq!(pool.free_count(SOURCE), 1);
    assert_eq!(pool.lease_count(), 0);
}

#[test]
fn stale_pool_after_scene_reload_allocates_fresh_mesh() {
    let mut world = make_world();
    let mut schedule = sprite_schedule();

    let first = spawn_baked(&mut world, Properties::default());
    step(&mut world, &mut schedule);
    let old = world.get::<MeshBinding>(first).unwrap().instance.unwrap();
    world.despawn(first);
    step(&mut world, &mut schedule);
    assert_eq!(world.resource::<MeshPool>().free_count(SOURCE), 1);

    world.resource_mut::<MeshStore>().invalidate_scene();

    let second = spawn_baked(&mut world, Properties::default());
    step(&mut world, &mut schedule);
    let fresh = world.get::<MeshBinding>(second).unwrap().instance.unwrap();

    let store = world.resource::<MeshStore>();
    assert_ne!(fresh, old);
    assert!(store.is_valid(fresh));
    assert_eq!(store.allocations(), 2);
    assert_eq!(world.resource::<MeshPool>().free_count(SOURCE), 0);
}

#[test]
fn pool_probe_publishes_debug_summary() {
    let mut world = make_world();
    let mut schedule = sprite_schedule();
    let probe = world.spawn((Properties::default(), PoolProbe)).id();
    let sprite = spawn_baked(&mut world, Properties::default());

    let debug = |world: &World| {
        world
            .get::<Properties>(probe)
            .unwrap()
            .get_str(PROP_DEBUG)
            .map(str::to_string)
    };

    step(&mut world, &mut schedule);
    assert_eq!(debug(&world).as_deref(), Some("1 | {}"));

    world.despawn(sprite);
    step(&mut world, &mut schedule);
    assert_eq!(debug(&world).as_deref(), Some("1 | {Sprite: 1}"));
}

#[test]
fn malformed_baked_data_leaves_object_unanimated() {
    let mut world = make_world();
    let mut schedule = sprite_schedule();
    let entity = spawn_sprite(&mut world, SpriteController::new("anim"), Properties::default());
    world
        .entity_mut(entity)
        .insert(BakedCycles("{ not json".to_string()));

    step(&mut world, &mut schedule);

    assert!(world.get::<SpriteAnimator>(entity).is_none());
    assert_eq!(world.get::<MeshBinding>(entity).unwrap().instance, None);
    assert_eq!(world.resource::<MeshStore>().allocations(), 0);
}

#[test]
fn vertex_count_mismatch_returns_leased_mesh() {
    let mut world = make_world();
    let mut schedule = sprite_schedule();
    let entity = spawn_sprite(&mut world, SpriteController::new("anim"), Properties::default());
    let triangle = serde_json::json!([
        { "name": "tri", "frames": [[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]] }
    ])
    .to_string();
    world.entity_mut(entity).insert(BakedCycles(triangle));

    step(&mut world, &mut schedule);
    assert!(world.get::<SpriteAnimator>(entity).is_none());
    assert_eq!(world.get::<MeshBinding>(entity).unwrap().instance, None);
    let pool = world.resource::<MeshPool>();
    assert_eq!(pool.free_count(SOURCE), 1);
    assert_eq!(pool.lease_count(), 0);

    // Retried next step with the pooled mesh.
    step(&mut world, &mut schedule);
    assert_eq!(world.resource::<MeshStore>().allocations(), 1);
}
