//! Geometry helpers (horizontal facing, AABB closest point).

use bevy::prelude::*;

/// Ближайшая точка AABB `[center - half_extents, center + half_extents]` к `from`.
pub fn closest_point_on_box(center: Vec3, half_extents: Vec3, from: Vec3) -> Vec3 {
    from.clamp(center - half_extents, center + half_extents)
}

/// Горизонтальное направление (y = 0), нормализованное. None если точки совпадают.
pub fn flat_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let mut delta = to - from;
    delta.y = 0.0;
    delta.try_normalize()
}

/// Yaw-поворот, при котором forward (-Z) смотрит вдоль `direction`.
pub fn yaw_facing(direction: Vec3) -> Quat {
    Quat::from_rotation_y(f32::atan2(-direction.x, -direction.z))
}

/// Повернуть transform к точке (только yaw) не больше чем на `max_degrees`.
///
/// Возвращает оставшийся угол (градусы) до полного разворота.
pub fn rotate_towards(transform: &mut Transform, point: Vec3, max_degrees: f32) -> f32 {
    let Some(direction) = flat_direction(transform.translation, point) else {
        return 0.0;
    };

    let desired = yaw_facing(direction);
    let angle = transform.rotation.angle_between(desired);
    let max_step = max_degrees.max(0.0).to_radians();

    if angle <= max_step || angle < 1e-5 {
        transform.rotation = desired;
        0.0
    } else {
        transform.rotation = transform.rotation.slerp(desired, max_step / angle);
        (angle - max_step).to_degrees()
    }
}
