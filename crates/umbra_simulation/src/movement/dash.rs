//! Dash - короткий прямолинейный рывок (≈0.2s).
//!
//! Точка приземления валидируется через navmesh sampling до старта:
//! нет проходимой точки → рывок не начинается (молча).
//! Во время рывка path-following приостановлен, позицию пишет AI.

use bevy::prelude::*;

use crate::shared::TIMER_EPSILON;
use crate::world::NavMeshQuery;

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Dash {
    start: Vec3,
    end: Vec3,
    duration: f32,
    elapsed: f32,
}

impl Dash {
    /// Спланировать рывок из `origin` вдоль `direction` на `distance` метров
    pub fn plan(
        origin: Vec3,
        direction: Vec3,
        distance: f32,
        duration: f32,
        sample_radius: f32,
        navmesh: &dyn NavMeshQuery,
    ) -> Option<Self> {
        let direction = direction.try_normalize()?;
        let desired = origin + direction * distance;
        let end = navmesh.sample_position(desired, sample_radius)?;

        Some(Self {
            start: origin,
            end,
            duration: duration.max(0.0),
            elapsed: 0.0,
        })
    }

    /// Продвинуть рывок, вернуть новую позицию (lerp start → end)
    pub fn advance(&mut self, delta: f32) -> Vec3 {
        self.elapsed = (self.elapsed + delta).min(self.duration);
        self.position()
    }

    pub fn position(&self) -> Vec3 {
        if self.duration <= 0.0 {
            return self.end;
        }
        self.start.lerp(self.end, self.elapsed / self.duration)
    }

    pub fn is_finished(&self) -> bool {
        self.duration - self.elapsed <= TIMER_EPSILON
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn end(&self) -> Vec3 {
        self.end
    }
}
