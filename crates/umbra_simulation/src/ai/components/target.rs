//! TargetBody - коллайдер преследуемого агента (для vision и capture).

use bevy::prelude::*;

use crate::shared::closest_point_on_box;

/// Axis-aligned bounds цели относительно Transform.translation
///
/// Без TargetBody используется сама позиция цели.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TargetBody {
    pub center_offset: Vec3,
    pub half_extents: Vec3,
}

impl Default for TargetBody {
    /// Капсула человеческого роста (1.8m), вписанная в box
    fn default() -> Self {
        Self {
            center_offset: Vec3::new(0.0, 0.9, 0.0),
            half_extents: Vec3::new(0.3, 0.9, 0.3),
        }
    }
}

impl TargetBody {
    pub fn closest_point(&self, position: Vec3, from: Vec3) -> Vec3 {
        closest_point_on_box(position + self.center_offset, self.half_extents, from)
    }
}
