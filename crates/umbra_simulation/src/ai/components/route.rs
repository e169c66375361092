//! PatrolRoute - циклический маршрут (общий для нескольких detector'ов).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect, Serialize, Deserialize)]
pub enum WaypointKind {
    #[default]
    Normal,
    /// Остановиться на `seconds` перед следующей точкой
    Wait { seconds: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: Vec3,
    #[serde(default)]
    pub kind: WaypointKind,
}

impl Waypoint {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            kind: WaypointKind::Normal,
        }
    }

    pub fn wait(position: Vec3, seconds: f32) -> Self {
        Self {
            position,
            kind: WaypointKind::Wait { seconds },
        }
    }
}

/// Маршрут на отдельной entity. Detector ссылается на неё, не владеет.
///
/// Пустой маршрут валиден: detector стоит на месте, сенсоры работают.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct PatrolRoute {
    pub waypoints: Vec<Waypoint>,
}

impl PatrolRoute {
    pub fn new(waypoints: impl IntoIterator<Item = Waypoint>) -> Self {
        Self {
            waypoints: waypoints.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Следующий индекс по кругу
    pub fn next_index(&self, index: usize) -> usize {
        if self.waypoints.is_empty() {
            0
        } else {
            (index + 1) % self.waypoints.len()
        }
    }
}
