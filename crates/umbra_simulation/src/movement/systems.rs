//! Headless locomotion: NavAgent → Transform по прямой.
//!
//! Заменяет NavigationAgent движка в тестах и demo binary.

use bevy::prelude::*;

use super::components::NavAgent;
use crate::shared::yaw_facing;

/// Система: прямолинейное движение к destination + report_path
pub fn drive_nav_agents(mut agents: Query<(&mut Transform, &mut NavAgent)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (mut transform, mut agent) in agents.iter_mut() {
        let Some(destination) = agent.destination() else {
            agent.report_path(0.0);
            continue;
        };

        let mut to_goal = destination - transform.translation;
        to_goal.y = 0.0;
        let distance = to_goal.length();

        if !agent.is_stopped() && distance > 0.0 {
            let step = (agent.speed * delta).min(distance);
            let direction = to_goal / distance;
            transform.translation += direction * step;

            if agent.update_rotation {
                transform.rotation = yaw_facing(direction);
            }
        }

        let mut remaining = destination - transform.translation;
        remaining.y = 0.0;
        agent.report_path(remaining.length());
    }
}
