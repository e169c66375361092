//! Сценарные тесты: headless app + UmbraSimulationPlugin, ручные fixed-тики.

use bevy::prelude::*;
use umbra_simulation::{
    advance_fixed_tick, advance_fixed_ticks, create_headless_app, emit_noise, spawn_detector,
    spawn_patrol_route, Captured, DarkZone, Detector, DetectorConfig, DetectorSpawn,
    DetectorState, DetectorStateChanged, EmitNoise, InputBlockable, InputBlocked, InputGate,
    MovementNoise, NoiseEmitter, NoiseEvent, NoiseHeard, PatrolRoute, SetupError, StealthState,
    TargetBody, Waypoint, ZoneCycle,
};

const TICKS_PER_SECOND: usize = 60;

fn spawn_player(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            StealthState::default(),
            TargetBody::default(),
            InputGate::default(),
        ))
        .id()
}

/// Detector в начале координат смотрит в -Z
fn spawn_guard(app: &mut App, player: Entity) -> Entity {
    spawn_detector(
        app.world_mut(),
        DetectorSpawn::new(player, Vec3::ZERO).facing(Vec3::NEG_Z),
    )
    .expect("valid detector setup")
}

fn drain<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

fn detector(app: &App, entity: Entity) -> &Detector {
    app.world().get::<Detector>(entity).expect("detector alive")
}

fn stealth(app: &mut App, player: Entity) -> Mut<'_, StealthState> {
    app.world_mut()
        .get_mut::<StealthState>(player)
        .expect("player alive")
}

#[test]
fn test_visible_player_is_chased_and_caught_once() {
    let mut app = create_headless_app(1);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -5.0));
    let guard = spawn_guard(&mut app, player);

    let mut captures = Vec::new();
    for _ in 0..TICKS_PER_SECOND * 10 {
        advance_fixed_tick(&mut app);
        captures.extend(drain::<Captured>(&mut app));
        if !captures.is_empty() {
            break;
        }
    }

    assert_eq!(captures.len(), 1, "поимка должна случиться ровно один раз");
    assert_eq!(captures[0].detector, guard);
    assert_eq!(captures[0].target, player);
    assert!(detector(&app, guard).is_captured());

    // Катсцена поимки: ввод игрока заблокирован
    let gate = app.world().get::<InputGate>(player).unwrap();
    assert!(gate.is_input_blocked());
    assert!(app.world().get::<InputBlocked>(player).is_some());

    // Заморожен: больше никаких событий
    advance_fixed_ticks(&mut app, TICKS_PER_SECOND * 3);
    assert!(drain::<Captured>(&mut app).is_empty());
    assert!(drain::<DetectorStateChanged>(&mut app)
        .iter()
        .all(|change| change.to != DetectorState::Patrol));
}

#[test]
fn test_state_changes_are_published() {
    let mut app = create_headless_app(2);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -6.0));
    let guard = spawn_guard(&mut app, player);

    advance_fixed_ticks(&mut app, TICKS_PER_SECOND * 4 + 5);

    let changes: Vec<_> = drain::<DetectorStateChanged>(&mut app)
        .into_iter()
        .map(|change| (change.detector, change.from, change.to))
        .collect();

    assert_eq!(
        changes,
        vec![
            (guard, DetectorState::Patrol, DetectorState::Alerting),
            (guard, DetectorState::Alerting, DetectorState::Chase),
        ]
    );
}

#[test]
fn test_dark_zone_hides_crouching_player() {
    let mut app = create_headless_app(3);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -3.0));
    stealth(&mut app, player).set_crouch(true);

    app.world_mut().spawn((
        Transform::from_xyz(0.0, 0.0, -3.0),
        DarkZone {
            level: 2,
            half_extents: Vec3::new(1.5, 2.0, 1.5),
        },
    ));
    let guard = spawn_guard(&mut app, player);

    advance_fixed_ticks(&mut app, TICKS_PER_SECOND * 10);
    assert_eq!(stealth(&mut app, player).darkness_level(), 2);
    assert_eq!(detector(&app, guard).state(), DetectorState::Patrol);
    assert_eq!(detector(&app, guard).detection(), 0.0);

    // Встал в зоне → полумрак, рост вдвое медленнее
    stealth(&mut app, player).set_crouch(false);
    advance_fixed_tick(&mut app);
    assert_eq!(stealth(&mut app, player).darkness_level(), 1);
    assert_eq!(detector(&app, guard).state(), DetectorState::Alerting);

    // Вышел из зоны → снова свет
    app.world_mut()
        .get_mut::<Transform>(player)
        .unwrap()
        .translation = Vec3::new(0.0, 0.0, -5.0);
    advance_fixed_tick(&mut app);
    assert_eq!(stealth(&mut app, player).darkness_level(), 0);
}

#[test]
fn test_flickering_zone_toggles_darkness() {
    let mut app = create_headless_app(4);
    let player = spawn_player(&mut app, Vec3::new(20.0, 0.0, 0.0));
    stealth(&mut app, player).set_crouch(true);

    app.world_mut().spawn((
        Transform::from_xyz(20.0, 0.0, 0.0),
        DarkZone::default(),
        ZoneCycle::new(1.0, 1.0),
    ));

    advance_fixed_ticks(&mut app, 30);
    assert_eq!(stealth(&mut app, player).darkness_level(), 2);

    // Свет включился
    advance_fixed_ticks(&mut app, 60);
    assert_eq!(stealth(&mut app, player).darkness_level(), 0);

    // И снова выключился
    advance_fixed_ticks(&mut app, 60);
    assert_eq!(stealth(&mut app, player).darkness_level(), 2);
}

#[test]
fn test_noise_emitter_on_start_triggers_chase() {
    let mut app = create_headless_app(5);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, 30.0));
    let guard = spawn_guard(&mut app, player);

    app.world_mut().spawn((
        Transform::from_xyz(2.0, 0.0, 0.0),
        NoiseEmitter {
            emit_on_start: true,
            ..default()
        },
    ));

    advance_fixed_tick(&mut app);

    let heard = drain::<NoiseHeard>(&mut app);
    assert_eq!(heard.len(), 1);
    assert_eq!(heard[0].detector, guard);
    assert_eq!(heard[0].loudness, MovementNoise::Run);

    let state = detector(&app, guard);
    assert_eq!(state.state(), DetectorState::Chase);
    assert_eq!(state.detection(), DetectorConfig::default().detection_threshold);
}

#[test]
fn test_emit_noise_request_out_of_hearing_range() {
    let mut app = create_headless_app(6);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, 30.0));
    let guard = spawn_guard(&mut app, player);

    // Громкий, но за hearing_radius detector'а
    let emitter = app
        .world_mut()
        .spawn((
            Transform::from_xyz(10.0, 0.0, 0.0),
            NoiseEmitter {
                radius: 20.0,
                ..default()
            },
        ))
        .id();

    app.world_mut().send_event(EmitNoise { emitter });
    advance_fixed_tick(&mut app);

    assert!(drain::<NoiseHeard>(&mut app).is_empty());
    assert_eq!(detector(&app, guard).state(), DetectorState::Patrol);
}

#[test]
fn test_emit_noise_reaches_every_detector_in_range() {
    let mut app = create_headless_app(7);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, 30.0));
    let near = spawn_guard(&mut app, player);
    let far = spawn_detector(
        app.world_mut(),
        DetectorSpawn::new(player, Vec3::new(12.0, 0.0, 0.0)),
    )
    .unwrap();

    let quiet = NoiseEvent {
        origin: Vec3::new(1.0, 0.0, 0.0),
        loudness: MovementNoise::Crouch,
        radius: 20.0,
    };
    assert_eq!(emit_noise(app.world_mut(), quiet), 0);

    let loud = NoiseEvent {
        loudness: MovementNoise::Run,
        ..quiet
    };
    assert_eq!(emit_noise(app.world_mut(), loud), 1);

    assert_eq!(detector(&app, near).state(), DetectorState::Chase);
    assert_eq!(detector(&app, far).state(), DetectorState::Patrol);
    assert_eq!(drain::<NoiseHeard>(&mut app).len(), 1);
}

/// Отдельный archetype: query обходит таблицы в порядке их создания
#[derive(Component)]
struct Veteran;

#[test]
fn test_emit_noise_publishes_in_entity_order() {
    let mut app = create_headless_app(9);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, 30.0));

    // Таблица с Veteran создаётся первой (этот detector шум не слышит)
    let deaf = app
        .world_mut()
        .spawn((
            Detector::new(player, None),
            Transform::from_xyz(50.0, 0.0, 0.0),
            Veteran,
        ))
        .id();
    let first = app
        .world_mut()
        .spawn((Detector::new(player, None), Transform::from_xyz(1.0, 0.0, 0.0)))
        .id();
    let second = app
        .world_mut()
        .spawn((
            Detector::new(player, None),
            Transform::from_xyz(-1.0, 0.0, 0.0),
            Veteran,
        ))
        .id();
    assert!(first < second);

    let noise = NoiseEvent {
        origin: Vec3::ZERO,
        loudness: MovementNoise::Run,
        radius: 6.0,
    };
    assert_eq!(emit_noise(app.world_mut(), noise), 2);

    let heard: Vec<Entity> = drain::<NoiseHeard>(&mut app)
        .iter()
        .map(|event| event.detector)
        .collect();
    assert_eq!(heard, vec![first, second]);

    let changed: Vec<Entity> = drain::<DetectorStateChanged>(&mut app)
        .iter()
        .map(|event| event.detector)
        .collect();
    assert_eq!(changed, vec![first, second]);
    assert_eq!(detector(&app, deaf).state(), DetectorState::Patrol);
}

#[test]
fn test_patrol_walks_route_in_order() {
    let mut app = create_headless_app(8);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, 40.0));
    stealth(&mut app, player).set_darkness(2);

    let route = spawn_patrol_route(
        app.world_mut(),
        PatrolRoute::new([
            Waypoint::at(Vec3::new(0.0, 0.0, -3.0)),
            Waypoint::at(Vec3::new(3.0, 0.0, -3.0)),
        ]),
    );
    let guard = spawn_detector(
        app.world_mut(),
        DetectorSpawn::new(player, Vec3::ZERO).with_route(route),
    )
    .unwrap();

    // Точка 0 через ~1.8s, точка 1 через ~3.6s, снова 0 через ~5.1s
    advance_fixed_ticks(&mut app, TICKS_PER_SECOND * 3);
    assert_eq!(detector(&app, guard).patrol_index(), 1);

    advance_fixed_ticks(&mut app, TICKS_PER_SECOND);
    assert_eq!(detector(&app, guard).patrol_index(), 0);
    assert_eq!(detector(&app, guard).state(), DetectorState::Patrol);
}

#[test]
fn test_spawn_detector_rejects_bad_setup() {
    let mut app = create_headless_app(9);
    let world = app.world_mut();

    let ghost = world.spawn_empty().id();
    world.despawn(ghost);
    assert!(matches!(
        spawn_detector(world, DetectorSpawn::new(ghost, Vec3::ZERO)),
        Err(SetupError::MissingTarget(entity)) if entity == ghost
    ));

    let no_stealth = world.spawn(Transform::default()).id();
    assert!(matches!(
        spawn_detector(world, DetectorSpawn::new(no_stealth, Vec3::ZERO)),
        Err(SetupError::TargetWithoutStealth(_))
    ));

    let player = world
        .spawn((Transform::default(), StealthState::default()))
        .id();
    let not_a_route = world.spawn_empty().id();
    assert!(matches!(
        spawn_detector(
            world,
            DetectorSpawn::new(player, Vec3::ZERO).with_route(not_a_route)
        ),
        Err(SetupError::MissingRoute(_))
    ));

    let broken = DetectorConfig {
        detection_threshold: 500.0,
        ..default()
    };
    assert!(matches!(
        spawn_detector(
            world,
            DetectorSpawn::new(player, Vec3::ZERO).with_config(broken)
        ),
        Err(SetupError::InvalidConfig(_))
    ));

    let possessed = world
        .spawn((
            Transform::default(),
            StealthState::default(),
            Detector::new(player, None),
        ))
        .id();
    assert!(matches!(
        spawn_detector(world, DetectorSpawn::new(possessed, Vec3::ZERO)),
        Err(SetupError::TargetIsDetector(_))
    ));

    assert!(world.query::<&Detector>().iter(world).count() == 1);
}

#[test]
fn test_despawned_target_is_skipped_at_runtime() {
    let mut app = create_headless_app(10);
    let player = spawn_player(&mut app, Vec3::new(0.0, 0.0, -5.0));
    let guard = spawn_guard(&mut app, player);

    advance_fixed_ticks(&mut app, 30);
    let detection = detector(&app, guard).detection();
    assert!(detection > 0.0);

    app.world_mut().despawn(player);
    advance_fixed_ticks(&mut app, 60);

    assert_eq!(detector(&app, guard).detection(), detection);
    assert_eq!(detector(&app, guard).state(), DetectorState::Alerting);
}
