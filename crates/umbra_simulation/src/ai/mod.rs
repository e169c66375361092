//! AI domain - detector: accumulator, Patrol/Alerting/Chase, vision/hearing
//!
//! - components: Detector, DetectorConfig, PatrolRoute, TargetBody
//! - perception: vision/hearing/capture проверки
//! - brain: покадровое поведение (state update → hearing → vision)
//! - systems: ECS обвязка, events

use bevy::prelude::*;

pub mod brain;
pub mod components;
pub mod events;
pub mod perception;
pub mod systems;

pub use components::*;
pub use events::*;
pub use systems::emit_noise;

use crate::stealth::NoiseEvent;
use crate::SimulationSet;

/// AI Plugin
///
/// Порядок (SimulationSet::Detection):
/// 1. dispatch_noise_events - внешние шумы
/// 2. update_detectors - тик state machine
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<NoiseEvent>()
            .add_event::<DetectorStateChanged>()
            .add_event::<NoiseHeard>()
            .add_event::<DashStarted>()
            .add_event::<DashFinished>()
            .add_event::<Captured>();

        app.add_systems(
            FixedUpdate,
            (systems::dispatch_noise_events, systems::update_detectors)
                .chain()
                .in_set(SimulationSet::Detection),
        );
    }
}
