//! Stealth domain - всё, что пишет в StealthState цели
//!
//! - state: StealthState (darkness / crouch / noise)
//! - zones: DarkZone, ZoneCycle (environment → darkness)
//! - noise: NoiseEmitter, NoiseEvent (дискретные шумы)

use bevy::prelude::*;

pub mod noise;
pub mod state;
pub mod zones;

pub use noise::{EmitNoise, NoiseEmitter, NoiseEvent};
pub use state::{MovementNoise, StealthState, MAX_DARKNESS};
pub use zones::{DarkZone, ZoneCycle, ZoneOccupancy};

use crate::SimulationSet;

/// Stealth Plugin
///
/// Порядок (SimulationSet::Environment):
/// 1. tick_zone_cycles - мигающие зоны
/// 2. apply_dark_zones - darkness оккупантов
/// 3. emit_requested_noise - NoiseEmitter → NoiseEvent
pub struct StealthPlugin;

impl Plugin for StealthPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<NoiseEvent>().add_event::<EmitNoise>();

        app.add_systems(
            FixedUpdate,
            (
                zones::tick_zone_cycles,
                zones::apply_dark_zones,
                noise::emit_requested_noise,
            )
                .chain()
                .in_set(SimulationSet::Environment),
        );
    }
}
