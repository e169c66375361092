//! ObstacleField - headless occlusion + navmesh на axis-aligned box'ах.
//!
//! Для тестов и demo binary. Raycast: slab test по каждому box'у, ближайшее попадание.
//! Navmesh: проходимо всё внутри walkable bounds (XZ), кроме колонн obstacle'ов.

use bevy::prelude::*;

use super::{NavMeshQuery, OcclusionQuery, RayHit};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub owner: Entity,
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Obstacle {
    /// Статичная геометрия (стена)
    pub fn wall(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            owner: Entity::PLACEHOLDER,
            center,
            half_extents,
        }
    }

    pub fn owned_by(mut self, owner: Entity) -> Self {
        self.owner = owner;
        self
    }

    fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Точка внутри XZ-проекции box'а (колонна блокирует навмеш)
    fn covers_xz(&self, point: Vec3) -> bool {
        (point.x - self.center.x).abs() < self.half_extents.x
            && (point.z - self.center.z).abs() < self.half_extents.z
    }

    /// Slab test. Возвращает t входа (0 если origin внутри).
    fn ray_entry(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let (min, max) = (self.min(), self.max());
        let mut t_enter = 0.0_f32;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];

            if d.abs() < 1e-8 {
                if o < min[axis] || o > max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (min[axis] - o) * inv;
            let mut t1 = (max[axis] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_enter = t_enter.max(t0);
            t_exit = t_exit.min(t1);
            if t_enter > t_exit {
                return None;
            }
        }

        Some(t_enter)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    /// Проходимая область в XZ (None = бесконечная плоскость)
    walkable: Option<Rect>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    /// Ограничить навмеш прямоугольником в XZ
    pub fn with_walkable_bounds(mut self, min: Vec2, max: Vec2) -> Self {
        self.walkable = Some(Rect::from_corners(min, max));
        self
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }
}

impl OcclusionQuery for ObstacleField {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let direction = direction.try_normalize()?;

        self.obstacles
            .iter()
            .filter_map(|obstacle| {
                obstacle
                    .ray_entry(origin, direction)
                    .filter(|t| *t <= max_distance)
                    .map(|t| (obstacle.owner, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entity, distance)| RayHit {
                entity,
                point: origin + direction * distance,
                distance,
            })
    }
}

impl NavMeshQuery for ObstacleField {
    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        let candidate = match self.walkable {
            Some(bounds) => {
                let clamped = Vec2::new(point.x, point.z).clamp(bounds.min, bounds.max);
                Vec3::new(clamped.x, point.y, clamped.y)
            }
            None => point,
        };

        if candidate.distance(point) > max_distance {
            return None;
        }
        if self.obstacles.iter().any(|o| o.covers_xz(candidate)) {
            return None;
        }

        Some(candidate)
    }
}
