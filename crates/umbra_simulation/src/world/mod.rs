//! World queries - внешние сервисы движка (raycast, navmesh sampling)
//!
//! HYBRID: ECS не владеет физикой и навмешем. Engine layer кладёт в мир
//! `WorldQueries` со своими реализациями, headless tools используют
//! `OpenSpace` / `ObstacleField`.

use bevy::prelude::*;

pub mod obstacle_field;

pub use obstacle_field::{Obstacle, ObstacleField};

/// Результат raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Владелец коллайдера (Entity::PLACEHOLDER для статичной геометрии)
    pub entity: Entity,
    pub point: Vec3,
    pub distance: f32,
}

/// Raycast по occluder'ам (стены, ящики, акторы)
pub trait OcclusionQuery: Send + Sync {
    /// Первое попадание луча в пределах `max_distance`
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}

/// Навмеш: ближайшая проходимая точка
pub trait NavMeshQuery: Send + Sync {
    /// None если в радиусе `max_distance` нет проходимой точки
    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3>;
}

/// Пустой мир: нет occluder'ов, всё проходимо
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSpace;

impl OcclusionQuery for OpenSpace {
    fn cast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<RayHit> {
        None
    }
}

impl NavMeshQuery for OpenSpace {
    fn sample_position(&self, point: Vec3, _max_distance: f32) -> Option<Vec3> {
        Some(point)
    }
}

/// Сервисы движка, доступные AI системам
#[derive(Resource)]
pub struct WorldQueries {
    pub occlusion: Box<dyn OcclusionQuery>,
    pub navmesh: Box<dyn NavMeshQuery>,
}

impl WorldQueries {
    pub fn new(
        occlusion: impl OcclusionQuery + 'static,
        navmesh: impl NavMeshQuery + 'static,
    ) -> Self {
        Self {
            occlusion: Box::new(occlusion),
            navmesh: Box::new(navmesh),
        }
    }

    pub fn open_space() -> Self {
        Self::new(OpenSpace, OpenSpace)
    }

    /// Один ObstacleField на оба сервиса
    pub fn from_field(field: ObstacleField) -> Self {
        Self::new(field.clone(), field)
    }
}

impl Default for WorldQueries {
    fn default() -> Self {
        Self::open_space()
    }
}
