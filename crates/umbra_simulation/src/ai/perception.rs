//! Perception - vision и hearing проверки (чистые функции, без ECS).

use bevy::prelude::*;

use super::components::{DetectorConfig, TargetBody};
use crate::stealth::StealthState;
use crate::world::OcclusionQuery;

/// Снимок цели на текущий тик
#[derive(Debug, Clone)]
pub struct TargetView {
    pub entity: Entity,
    pub position: Vec3,
    pub body: Option<TargetBody>,
    pub stealth: StealthState,
}

impl TargetView {
    /// Ближайшая точка коллайдера цели к `from` (fallback: позиция цели)
    pub fn closest_point(&self, from: Vec3) -> Vec3 {
        match self.body {
            Some(body) => body.closest_point(self.position, from),
            None => self.position,
        }
    }
}

/// Результат vision проверки
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sighting {
    /// Цель в полной темноте: vision не работает вовсе
    Hidden,
    /// Вне дальности или конуса: accumulator не трогаем
    OutOfView,
    /// Луч упёрся в препятствие раньше цели
    Occluded,
    Visible,
}

/// Позиция глаз detector'а
pub fn eye_position(transform: &Transform, config: &DetectorConfig) -> Vec3 {
    transform.translation + Vec3::Y * config.eye_height
}

/// Vision: darkness → range → FOV → raycast
///
/// `is_target` - попадание в цель или её потомка (child collider).
pub fn observe(
    transform: &Transform,
    config: &DetectorConfig,
    target: &TargetView,
    occlusion: &dyn OcclusionQuery,
    is_target: &dyn Fn(Entity) -> bool,
) -> Sighting {
    if target.stealth.is_fully_hidden() {
        return Sighting::Hidden;
    }

    let eye = eye_position(transform, config);
    let point = target.closest_point(eye);
    let to_target = point - eye;
    let distance = to_target.length();

    if distance > config.vision_range {
        return Sighting::OutOfView;
    }

    // Глаза внутри коллайдера цели
    let Some(direction) = to_target.try_normalize() else {
        return Sighting::Visible;
    };

    let angle = transform.forward().as_vec3().angle_between(direction).to_degrees();
    if angle > config.vision_fov * 0.5 {
        return Sighting::OutOfView;
    }

    match occlusion.cast(eye, direction, config.vision_range) {
        None => Sighting::Visible,
        Some(hit) if is_target(hit.entity) => Sighting::Visible,
        // Попадание за поверхностью цели (стена позади) не загораживает
        Some(hit) if hit.distance > distance + 1e-3 => Sighting::Visible,
        Some(_) => Sighting::Occluded,
    }
}

/// Hearing шагов цели: громкость ≥ порога и цель в hearing_radius
pub fn hears_target(listener: Vec3, config: &DetectorConfig, target: &TargetView) -> bool {
    target.stealth.movement_noise() >= config.hearing_threshold
        && listener.distance(target.position) <= config.hearing_radius
}

/// Capture: detector ↔ ближайшая точка коллайдера цели
pub fn within_attack_distance(position: Vec3, config: &DetectorConfig, target: &TargetView) -> bool {
    position.distance(target.closest_point(position)) <= config.attack_distance
}
