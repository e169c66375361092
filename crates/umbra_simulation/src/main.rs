//! Headless симуляция Umbra
//!
//! Сценарий: детектор патрулирует, игрок крадётся к нему через тёмную зону,
//! выходит на свет и встаёт - детектор замечает, гонится, ловит.

use bevy::prelude::*;
use umbra_simulation::{
    advance_fixed_tick, create_headless_app, spawn_detector, spawn_patrol_route, Captured,
    DarkZone, DetectorSpawn, DetectorStateChanged, InputGate, MovementNoise, PatrolRoute,
    StealthState, TargetBody, Waypoint,
};

const MAX_TICKS: usize = 60 * 60;

fn main() {
    let seed = 42;
    println!("Starting Umbra headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    let world = app.world_mut();

    let mut stealth = StealthState::default();
    stealth.set_crouch(true);
    let player = world
        .spawn((
            Transform::from_xyz(0.0, 0.0, -12.0),
            stealth,
            TargetBody::default(),
            InputGate::default(),
        ))
        .id();

    // Тёмный коридор между игроком и маршрутом
    world.spawn((
        Transform::from_xyz(0.0, 0.0, -8.0),
        DarkZone {
            level: 2,
            half_extents: Vec3::new(2.0, 2.0, 3.0),
        },
    ));

    let route = spawn_patrol_route(
        world,
        PatrolRoute::new([
            Waypoint::at(Vec3::new(-3.0, 0.0, 0.0)),
            Waypoint::wait(Vec3::new(3.0, 0.0, 0.0), 2.0),
        ]),
    );

    let detector = match spawn_detector(
        world,
        DetectorSpawn::new(player, Vec3::ZERO)
            .with_route(route)
            .facing(Vec3::new(0.0, 0.0, -1.0)),
    ) {
        Ok(entity) => entity,
        Err(error) => {
            eprintln!("Setup failed: {}", error);
            std::process::exit(1);
        }
    };

    for tick in 0..MAX_TICKS {
        move_player(&mut app, player, tick);
        advance_fixed_tick(&mut app);

        let world = app.world_mut();
        for change in world.resource_mut::<Events<DetectorStateChanged>>().drain() {
            println!(
                "Tick {}: {:?} {:?} → {:?}",
                tick, change.detector, change.from, change.to
            );
        }

        let captured: Vec<Captured> = world.resource_mut::<Events<Captured>>().drain().collect();
        if let Some(capture) = captured.first() {
            println!(
                "Tick {}: {:?} caught {:?} (input blocked: {})",
                tick,
                capture.detector,
                capture.target,
                world
                    .get::<InputGate>(player)
                    .is_some_and(|gate| umbra_simulation::InputBlockable::is_input_blocked(gate))
            );
            break;
        }

        if tick % 120 == 0 {
            if let Some(detector) = world.get::<umbra_simulation::Detector>(detector) {
                println!(
                    "Tick {}: state {:?}, detection {:.1}",
                    tick,
                    detector.state(),
                    detector.detection()
                );
            }
        }
    }

    println!("Simulation complete!");
}

/// Игрок крадётся вперёд 4 секунды, потом встаёт и идёт
fn move_player(app: &mut App, player: Entity, tick: usize) {
    let world = app.world_mut();

    if tick == 60 * 4 {
        if let Some(mut stealth) = world.get_mut::<StealthState>(player) {
            stealth.set_crouch(false);
            stealth.set_movement_noise(MovementNoise::Silent);
        }
    }

    if let Some(mut transform) = world.get_mut::<Transform>(player) {
        if transform.translation.z < -1.0 {
            transform.translation.z += 1.0 / 60.0;
        }
    }
}
