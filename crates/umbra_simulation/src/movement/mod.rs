//! Movement domain - navigation contract и рывки
//!
//! Содержит:
//! - NavAgent (контракт с navigation layer движка)
//! - Dash (прямолинейный рывок с валидацией через navmesh)
//! - HeadlessNavigation + drive_nav_agents (straight-line locomotion без движка)

use bevy::prelude::*;

pub mod components;
pub mod dash;
pub mod systems;

pub use components::*;
pub use dash::Dash;
pub use systems::drive_nav_agents;

use crate::SimulationSet;

/// Movement Plugin
///
/// В SimulationSet::Locomotion, только если в мире есть HeadlessNavigation
/// (иначе NavAgent обслуживает движок).
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            drive_nav_agents
                .run_if(resource_exists::<HeadlessNavigation>)
                .in_set(SimulationSet::Locomotion),
        );
    }
}
