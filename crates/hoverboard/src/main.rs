//! Headless run of the rider against a small Rapier scene.
//!
//! Walks a few steps, mounts the board, jumps a ramp with tricks, lands,
//! then rides into a wall, gets up and steps off. Pass a path to a tuning
//! file as the first argument, or drop a `hoverboard.ron` next to the binary.

use std::time::Duration;

use anyhow::{Context, Result};
use engine_core::{Quat, Time, Vec2, Vec3};
use hoverboard::host::RapierRig;
use hoverboard::{ControlSnapshot, Integration, NullAnimator, Player, PlayerEvent, PlayerMode, TuningConfig};
use physics::{CollisionGroup, PhysicsWorld};

const FRAME: Duration = Duration::from_micros(16_667);
const RUN_SECONDS: f32 = 14.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let tuning = match std::env::args().nth(1) {
        Some(path) => TuningConfig::load_from(&path).with_context(|| format!("loading tuning from {path}"))?,
        None => TuningConfig::load(),
    };

    let mut world = build_scene();
    let mut rig = RapierRig::new(&mut world);
    let mut player = Player::new(&tuning, NullAnimator).with_integration(Integration::External);
    player.subscribe(Box::new(|event: &PlayerEvent| match event {
        PlayerEvent::ModeChanged { .. } => {}
        other => log::info!("event: {other:?}"),
    }));
    player.spawn(Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY);

    let mut time = Time::new();
    time.set_fixed_rate(50.0);
    let mut fallen_for = 0.0;

    while time.elapsed_seconds() < RUN_SECONDS {
        time.advance(FRAME);
        let t = time.elapsed_seconds();
        let dt = time.delta_seconds();

        player.apply_controls(&script(t, player.mode()));
        player.frame_update(dt);

        while time.should_fixed_update() {
            let step = time.fixed_timestep_seconds();
            let report = rig.step(&mut world, &mut player, step);
            if let Some(board) = report.board {
                log::trace!("t={t:.2} grounded={} distance={:?}", board.grounded, board.ground_distance);
            }
        }

        // Nothing simulates the ragdoll here; it comes to rest a second after the crash.
        if player.mode() == PlayerMode::Fall {
            fallen_for += dt;
            let velocity = if fallen_for > 1.0 { Vec3::ZERO } else { Vec3::new(0.0, 0.0, -3.0) };
            let position = player.walker().body.position();
            player.report_ragdoll(position, velocity);
        } else {
            fallen_for = 0.0;
        }

        if time.frame_count() % 60 == 0 {
            let board = player.board();
            log::info!(
                "t={t:5.2}s mode={:<6} board=({:6.2}, {:5.2}, {:7.2}) speed={:5.1} km/h tricks={:5.1}",
                player.mode().label(),
                board.body.position().x,
                board.body.position().y,
                board.body.position().z,
                board.speed_kmh(),
                player.tricks().amount(),
            );
        }
        player.drain_events();
    }

    log::info!("finished in mode {}", player.mode().label());
    Ok(())
}

/// Flat ground, a ramp 30 m ahead, a hedge the rider can brush at low speed and a wall.
fn build_scene() -> PhysicsWorld {
    let mut world = PhysicsWorld::new();
    world.add_ground_plane();
    world.add_static_cuboid(
        Vec3::new(0.0, 0.6, -30.0),
        Quat::from_rotation_x(0.25),
        Vec3::new(3.0, 0.2, 4.0),
        CollisionGroup::environment(),
    );
    world.add_static_cuboid(
        Vec3::new(6.0, 1.0, -70.0),
        Quat::IDENTITY,
        Vec3::new(1.0, 1.0, 1.0),
        CollisionGroup::scenery(),
    );
    world.add_static_cuboid(
        Vec3::new(0.0, 2.0, -110.0),
        Quat::IDENTITY,
        Vec3::new(10.0, 2.0, 0.5),
        CollisionGroup::environment(),
    );
    world.update_query_pipeline();
    world
}

/// Scripted controls for time `t` in seconds.
fn script(t: f32, mode: PlayerMode) -> ControlSnapshot {
    let mut controls = ControlSnapshot::default();
    match t {
        t if t < 1.0 => controls.movement = Vec2::new(0.0, 1.0),
        t if t < 1.05 => controls.toggle_mode = true,
        t if t < 4.0 => controls.thruster_trigger = 1.0,
        t if t < 4.6 => {
            controls.thruster_trigger = 1.0;
            controls.jump_held = true;
        }
        t if t < 6.0 && mode == PlayerMode::InAir => {
            controls.trick_toggle = Vec2::new(0.0, 1.0);
            controls.trick_axes = Vec2::new(1.0, 0.0);
        }
        t if t < 9.0 => controls.thruster_trigger = 1.0,
        t if t < 11.0 => {}
        t if t < 11.05 => controls.toggle_mode = true,
        t if t < 12.0 => controls.brake_held = true,
        t if t < 12.05 => controls.toggle_mode = true,
        _ => {}
    }
    controls
}
