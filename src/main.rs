//! Sprycle preview entry point.
//!
//! Runs a sprite animation headless and logs the UVs written each step,
//! which is enough to check baked cycle data or a grid layout without the
//! host engine.
//!
//! # Main Loop
//!
//! 1. Load [`PreviewConfig`] from the INI file, apply command-line overrides
//! 2. Build a world with one quad mesh covering the first sheet cell
//! 3. Spawn one animated object configured from the preview settings
//! 4. Step the sprite schedule `steps` times, `dt` seconds apart
//! 5. Despawn the object, let its mesh return to the pool, and report
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --data walk.json --cycle walk --fps 8 --steps 32
//! cargo run --release -- --xstep 4 --total-frames 8 --xflip
//! ```

use bevy_ecs::prelude::*;
use clap::Parser;
use glam::Vec2;
use log::{debug, info};
use std::path::PathBuf;

use sprycle::components::bakedcycles::BakedCycles;
use sprycle::components::meshbinding::MeshBinding;
use sprycle::components::poolprobe::PoolProbe;
use sprycle::components::properties::Properties;
use sprycle::components::spriteconfig::{
    PROP_ANIMATION, PROP_CURRENT_FRAME, PROP_DEBUG, PROP_FPS, PROP_REVERSED, PROP_TOTAL_FRAMES,
    PROP_XFLIPPED, PROP_XSTEP, PROP_YFLIPPED,
};
use sprycle::components::spritecontroller::SpriteController;
use sprycle::events::actuator::ActuatorActivated;
use sprycle::resources::meshpool::MeshPool;
use sprycle::resources::meshstore::{MeshData, MeshStore};
use sprycle::resources::previewconfig::PreviewConfig;
use sprycle::resources::worldtime::WorldTime;
use sprycle::systems::animation::SPRITE_POLYGON;
use sprycle::systems::sprite_schedule;
use sprycle::systems::time::update_world_time;

const SPRITE_MESH: &str = "Sprite";

/// Sprycle sprite animation preview
#[derive(Parser)]
#[command(version, about = "Headless preview of sprite-sheet UV animations.")]
struct Cli {
    /// INI file with preview settings (default: ./sprycle.ini if present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Baked cycle data (JSON). Without it the sheet grid is used.
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Cycle to play.
    #[arg(long)]
    cycle: Option<String>,

    /// Frames per second; 0 freezes playback.
    #[arg(long)]
    fps: Option<f32>,

    /// Number of steps to simulate.
    #[arg(long)]
    steps: Option<u32>,

    /// Seconds per step.
    #[arg(long)]
    dt: Option<f32>,

    /// Grid cells per row.
    #[arg(long)]
    xstep: Option<u32>,

    /// Grid cell count.
    #[arg(long)]
    total_frames: Option<u32>,

    /// Play backwards.
    #[arg(long)]
    reversed: bool,

    /// Mirror horizontally.
    #[arg(long)]
    xflip: bool,

    /// Mirror vertically.
    #[arg(long)]
    yflip: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // --------------- Configuration ---------------
    let mut config = match &cli.config {
        Some(path) => PreviewConfig::with_path(path),
        None => PreviewConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        if cli.config.is_some() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        debug!("No config file, using defaults: {}", e);
    }
    apply_cli_overrides(&mut config, &cli);

    let baked = match &cli.data {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) => {
                eprintln!("Error reading {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => None,
    };

    // --------------- World + resources ---------------
    let (min, max) = first_cell(config.xstep, config.total_frames);
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(MeshStore::new().with_source(SPRITE_MESH, MeshData::quad(min, max)));
    world.insert_resource(MeshPool::new());

    world.add_observer(|trigger: On<ActuatorActivated>| {
        let event = trigger.event();
        info!(
            "Cycle '{}' completed, actuator '{}' fired",
            event.cycle, event.actuator
        );
    });

    let sprite = world
        .spawn((
            SpriteController::new("preview")
                .with_sensor("always", true)
                .with_actuator("cycle_done"),
            object_properties(&config),
            MeshBinding::new(SPRITE_MESH),
            PoolProbe,
        ))
        .id();
    if let Some(text) = baked {
        world.entity_mut(sprite).insert(BakedCycles(text));
    }

    // --------------- Main loop ---------------
    let mut schedule = sprite_schedule();
    for _ in 0..config.steps {
        update_world_time(&mut world, config.dt);
        schedule.run(&mut world);
        world.clear_trackers();
        report_step(&world, sprite);
    }

    // --------------- Teardown ---------------
    if let Some(props) = world.get::<Properties>(sprite)
        && let Some(text) = props.get_str(PROP_DEBUG)
    {
        info!("Pool before teardown: {}", text);
    }
    world.despawn(sprite);
    update_world_time(&mut world, config.dt);
    schedule.run(&mut world);
    info!(
        "Pool after teardown: {}",
        world.resource::<MeshPool>().summary()
    );
    world.resource_mut::<MeshPool>().clear();
}

fn apply_cli_overrides(config: &mut PreviewConfig, cli: &Cli) {
    if let Some(cycle) = &cli.cycle {
        config.cycle = Some(cycle.clone());
    }
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    if let Some(steps) = cli.steps {
        config.steps = steps;
    }
    if let Some(dt) = cli.dt {
        config.dt = dt;
    }
    if let Some(xstep) = cli.xstep {
        config.xstep = xstep;
    }
    if let Some(total) = cli.total_frames {
        config.total_frames = total;
    }
    config.reversed |= cli.reversed;
    config.xflipped |= cli.xflip;
    config.yflipped |= cli.yflip;
}

/// UV bounds of the top-left cell of a sheet laid out `xstep` cells wide.
fn first_cell(xstep: u32, total_frames: u32) -> (Vec2, Vec2) {
    let columns = xstep.max(1);
    let rows = total_frames.max(columns).div_ceil(columns);
    let cell = Vec2::new(1.0 / columns as f32, 1.0 / rows as f32);
    (Vec2::new(0.0, 1.0 - cell.y), Vec2::new(cell.x, 1.0))
}

fn object_properties(config: &PreviewConfig) -> Properties {
    let mut props = Properties::default()
        .with(PROP_FPS, config.fps)
        .with(PROP_REVERSED, config.reversed)
        .with(PROP_XFLIPPED, config.xflipped)
        .with(PROP_YFLIPPED, config.yflipped)
        .with(PROP_XSTEP, config.xstep as i64)
        .with(PROP_TOTAL_FRAMES, config.total_frames as i64);
    if let Some(cycle) = &config.cycle {
        props.set(PROP_ANIMATION, cycle.clone());
    }
    props
}

fn report_step(world: &World, sprite: Entity) {
    let time = world.resource::<WorldTime>();
    let (Some(props), Some(binding)) = (
        world.get::<Properties>(sprite),
        world.get::<MeshBinding>(sprite),
    ) else {
        return;
    };
    let Some(mesh) = binding.instance else {
        return;
    };
    let Ok(polygon) = world
        .resource::<MeshStore>()
        .instance(mesh)
        .and_then(|data| data.polygon(SPRITE_POLYGON))
    else {
        return;
    };
    let uvs = polygon
        .uvs
        .iter()
        .map(|uv| format!("({:.3}, {:.3})", uv.x, uv.y))
        .collect::<Vec<_>>()
        .join(" ");
    info!(
        "step {:>4} t={:>7.3} frame={} uvs={}",
        time.frame_count,
        time.elapsed,
        props.get_int(PROP_CURRENT_FRAME).unwrap_or_default(),
        uvs
    );
}
