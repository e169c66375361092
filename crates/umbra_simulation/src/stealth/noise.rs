//! Noise - дискретные шумы (упавший предмет, брошенная бутылка, сигнализация)
//!
//! NoiseEmitter → NoiseEvent (broadcast) → все detector'ы в радиусе.
//! Доставка синхронная: `dispatch_noise_events` обрабатывает события в том же тике,
//! `ai::emit_noise` - прямой вызов через &mut World.

use bevy::prelude::*;

use super::state::MovementNoise;

/// Broadcast: шум громкости `loudness` в точке `origin`, слышен в `radius`
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct NoiseEvent {
    pub origin: Vec3,
    pub loudness: MovementNoise,
    pub radius: f32,
}

/// Request: эмиттер должен издать шум (триггер, collision callback, скрипт)
#[derive(Event, Debug, Clone, Copy)]
pub struct EmitNoise {
    pub emitter: Entity,
}

/// Источник шума на объекте
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NoiseEmitter {
    pub loudness: MovementNoise,
    /// Радиус слышимости (метры)
    pub radius: f32,
    /// Издать шум один раз сразу после спавна
    pub emit_on_start: bool,
}

impl Default for NoiseEmitter {
    fn default() -> Self {
        Self {
            loudness: MovementNoise::Run,
            radius: 6.0,
            emit_on_start: false,
        }
    }
}

impl NoiseEmitter {
    pub fn event_at(&self, origin: Vec3) -> NoiseEvent {
        NoiseEvent {
            origin,
            loudness: self.loudness,
            radius: self.radius,
        }
    }
}

/// OverlapSphere: кто из слушателей внутри радиуса шума
pub fn within_noise_radius(listener: Vec3, origin: Vec3, radius: f32) -> bool {
    listener.distance(origin) <= radius
}

/// Система: NoiseEmitter (on start + по запросу) → NoiseEvent
pub fn emit_requested_noise(
    emitters: Query<(&NoiseEmitter, &Transform)>,
    fresh: Query<Entity, Added<NoiseEmitter>>,
    mut requests: EventReader<EmitNoise>,
    mut noise_events: EventWriter<NoiseEvent>,
) {
    for entity in fresh.iter() {
        let Ok((emitter, transform)) = emitters.get(entity) else {
            continue;
        };
        if emitter.emit_on_start {
            noise_events.write(emitter.event_at(transform.translation));
        }
    }

    for request in requests.read() {
        let Ok((emitter, transform)) = emitters.get(request.emitter) else {
            crate::log_warning(&format!(
                "EmitNoise: entity {:?} has no NoiseEmitter",
                request.emitter
            ));
            continue;
        };

        crate::log(&format!(
            "🔊 Noise {:?} at {:?} (r={})",
            emitter.loudness, transform.translation, emitter.radius
        ));
        noise_events.write(emitter.event_at(transform.translation));
    }
}
