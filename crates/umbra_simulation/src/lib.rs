//! Umbra Simulation Core
//!
//! ECS-симуляция скрытности на Bevy 0.16 (strategic layer):
//! стелс-состояние цели, detector'ы с Patrol/Alerting/Chase, поимка.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (stealth state, detection, решения AI)
//! - Engine = tactical layer (raycast, navmesh, анимация, аудио)
//!   подключается через `WorldQueries` и `NavAgent`

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod error;
pub mod logger;
pub mod movement;
pub mod pursuit;
pub mod shared;
pub mod stealth;
pub mod world;

// Re-export базовых типов для удобства
pub use ai::{
    emit_noise, AIPlugin, Captured, DashFinished, DashStarted, Detector, DetectorConfig,
    DetectorState, DetectorStateChanged, NoiseHeard, PatrolRoute, TargetBody, Waypoint,
    WaypointKind,
};
pub use error::SetupError;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger,
    set_logger_if_needed, LogLevel, LogPrinter,
};
pub use movement::{HeadlessNavigation, MovementPlugin, NavAgent};
pub use pursuit::{InputBlockRequested, InputBlockable, InputBlocked, InputGate, PursuitPlugin};
pub use stealth::{
    DarkZone, EmitNoise, MovementNoise, NoiseEmitter, NoiseEvent, StealthPlugin, StealthState,
    ZoneCycle,
};
pub use world::{NavMeshQuery, Obstacle, ObstacleField, OcclusionQuery, OpenSpace, WorldQueries};

/// Порядок фаз внутри FixedUpdate
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Зоны темноты, эмиттеры шума → StealthState / NoiseEvent
    Environment,
    /// Detector'ы: state update → hearing → vision
    Detection,
    /// Последствия поимки
    Outcome,
    /// Headless locomotion (в движке - его NavigationAgent)
    Locomotion,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// WorldQueries и DeterministicRng не перезаписываются, если host
/// вставил свои до add_plugins.
pub struct UmbraSimulationPlugin;

impl Plugin for UmbraSimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Environment,
                SimulationSet::Detection,
                SimulationSet::Outcome,
                SimulationSet::Locomotion,
            )
                .chain(),
        );

        if !app.world().contains_resource::<WorldQueries>() {
            app.insert_resource(WorldQueries::open_space());
        }
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_plugins((StealthPlugin, AIPlugin, PursuitPlugin, MovementPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Навигация headless (HeadlessNavigation), мир пустой (OpenSpace).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)) // 60Hz FixedUpdate
        .insert_resource(HeadlessNavigation)
        .add_plugins(UmbraSimulationPlugin);

    app
}

/// Один fixed-тик вручную (детерминированно, без wall clock)
pub fn advance_fixed_tick(app: &mut App) {
    let timestep = app.world().resource::<Time<Fixed>>().timestep();
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .advance_by(timestep);
    app.world_mut().run_schedule(FixedUpdate);
}

/// `ticks` fixed-тиков подряд
pub fn advance_fixed_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        advance_fixed_tick(app);
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

/// Параметры спавна detector'а
#[derive(Debug, Clone)]
pub struct DetectorSpawn {
    pub transform: Transform,
    pub target: Entity,
    pub route: Option<Entity>,
    pub config: DetectorConfig,
}

impl DetectorSpawn {
    pub fn new(target: Entity, position: Vec3) -> Self {
        Self {
            transform: Transform::from_translation(position),
            target,
            route: None,
            config: DetectorConfig::default(),
        }
    }

    pub fn with_route(mut self, route: Entity) -> Self {
        self.route = Some(route);
        self
    }

    pub fn with_config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Повернуть detector лицом к точке (yaw)
    pub fn facing(mut self, point: Vec3) -> Self {
        if let Some(direction) = shared::flat_direction(self.transform.translation, point) {
            self.transform.rotation = shared::yaw_facing(direction);
        }
        self
    }
}

/// Единственный поддерживаемый способ создать detector: всё валидируется здесь
pub fn spawn_detector(world: &mut World, spawn: DetectorSpawn) -> Result<Entity, SetupError> {
    let result = validate_spawn(world, &spawn);
    if let Err(error) = &result {
        log_error(&format!("spawn_detector failed: {}", error));
    }
    result?;

    let entity = world
        .spawn((
            Detector::new(spawn.target, spawn.route),
            spawn.transform,
            spawn.config,
            NavAgent::default(),
        ))
        .id();

    log_info(&format!(
        "Detector {:?} spawned at {:?}, target {:?}",
        entity, spawn.transform.translation, spawn.target
    ));
    Ok(entity)
}

fn validate_spawn(world: &World, spawn: &DetectorSpawn) -> Result<(), SetupError> {
    spawn.config.validate()?;

    let target = world
        .get_entity(spawn.target)
        .map_err(|_| SetupError::MissingTarget(spawn.target))?;
    if !target.contains::<StealthState>() {
        return Err(SetupError::TargetWithoutStealth(spawn.target));
    }
    if !target.contains::<Transform>() {
        return Err(SetupError::TargetWithoutTransform(spawn.target));
    }
    if target.contains::<Detector>() {
        return Err(SetupError::TargetIsDetector(spawn.target));
    }

    if let Some(route) = spawn.route {
        let has_route = world
            .get_entity(route)
            .is_ok_and(|entity| entity.contains::<PatrolRoute>());
        if !has_route {
            return Err(SetupError::MissingRoute(route));
        }
    }

    Ok(())
}

/// Маршрут на отдельной entity (может быть общим для нескольких detector'ов)
pub fn spawn_patrol_route(world: &mut World, route: PatrolRoute) -> Entity {
    world.spawn(route).id()
}
