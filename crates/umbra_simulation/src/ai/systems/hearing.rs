//! External noise → detector'ы (OverlapSphere по всем слушателям).

use bevy::prelude::*;

use super::{publish_to_world, DetectorEvents};
use crate::ai::components::{Detector, DetectorConfig};
use crate::movement::NavAgent;
use crate::stealth::NoiseEvent;

/// Система: NoiseEvent (из NoiseEmitter и скриптов) → hear_noise каждого detector'а
pub fn dispatch_noise_events(
    mut noises: EventReader<NoiseEvent>,
    mut detectors: Query<(Entity, &mut Detector, &Transform, &mut NavAgent, &DetectorConfig)>,
    time: Res<Time<Fixed>>,
    mut events: DetectorEvents,
) {
    let now = time.elapsed_secs();

    let mut order: Vec<Entity> = detectors.iter().map(|(entity, ..)| entity).collect();
    order.sort();

    for noise in noises.read() {
        for &entity in &order {
            let Ok((_, mut detector, transform, mut nav, config)) = detectors.get_mut(entity) else {
                continue;
            };
            let mut signals = Vec::new();
            detector.hear_noise(noise, transform.translation, now, config, &mut nav, &mut signals);
            events.publish_all(entity, signals);
        }
    }
}

/// Синхронный шум через &mut World (скрипты, катсцены, тесты).
///
/// Возвращает число detector'ов, которые среагировали.
/// Обход и события - в порядке Entity, как в `update_detectors`.
pub fn emit_noise(world: &mut World, noise: NoiseEvent) -> usize {
    let now = world
        .get_resource::<Time<Fixed>>()
        .map_or(0.0, |time| time.elapsed_secs());

    let mut heard = 0;
    let mut signals = Vec::new();

    let mut detectors =
        world.query::<(Entity, &mut Detector, &Transform, &mut NavAgent, &DetectorConfig)>();
    let mut order: Vec<Entity> = detectors.iter(world).map(|(entity, ..)| entity).collect();
    order.sort();

    for entity in order {
        let Ok((_, mut detector, transform, mut nav, config)) = detectors.get_mut(world, entity)
        else {
            continue;
        };
        let mut local = Vec::new();
        if detector.hear_noise(&noise, transform.translation, now, config, &mut nav, &mut local) {
            heard += 1;
        }
        signals.extend(local.into_iter().map(|signal| (entity, signal)));
    }

    for (entity, signal) in signals {
        publish_to_world(world, entity, signal);
    }

    heard
}
