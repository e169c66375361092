//! Detection system - один тик всех detector'ов.

use std::collections::HashSet;

use bevy::prelude::*;

use super::DetectorEvents;
use crate::ai::brain::{AgentBody, TickContext};
use crate::ai::components::{Detector, DetectorConfig, PatrolRoute, TargetBody};
use crate::ai::perception::TargetView;
use crate::movement::NavAgent;
use crate::stealth::StealthState;
use crate::world::WorldQueries;
use crate::DeterministicRng;

/// Попадание в `root` или в его потомка (child collider)
pub fn is_part_of(entity: Entity, root: Entity, parents: &Query<&ChildOf>) -> bool {
    let mut current = entity;
    loop {
        if current == root {
            return true;
        }
        match parents.get(current) {
            Ok(child_of) => current = child_of.parent(),
            Err(_) => return false,
        }
    }
}

/// Detector'ы, о пропавшей цели которых уже предупредили (warning один раз)
#[derive(Debug, Default)]
pub struct MissingTargetLog {
    warned: HashSet<Entity>,
}

impl MissingTargetLog {
    /// true = первый раз, надо залогировать
    pub fn report(&mut self, detector: Entity) -> bool {
        self.warned.insert(detector)
    }

    /// Цель снова на месте
    pub fn resolve(&mut self, detector: Entity) {
        self.warned.remove(&detector);
    }

    /// Забыть despawn'нутые detector'ы
    pub fn retain_alive(&mut self, is_alive: impl Fn(Entity) -> bool) {
        self.warned.retain(|detector| is_alive(*detector));
    }

    pub fn len(&self) -> usize {
        self.warned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warned.is_empty()
    }
}

/// Система: state update → hearing → vision для каждого detector'а
///
/// Порядок обхода - по Entity (RNG детерминирован).
/// Пропавшая цель: warning один раз, detector пропускается.
pub fn update_detectors(
    mut detectors: Query<(Entity, &mut Detector, &mut Transform, &mut NavAgent, &DetectorConfig)>,
    targets: Query<(&Transform, &StealthState, Option<&TargetBody>), Without<Detector>>,
    routes: Query<&PatrolRoute>,
    parents: Query<&ChildOf>,
    queries: Res<WorldQueries>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut missing_targets: Local<MissingTargetLog>,
    mut events: DetectorEvents,
) {
    let delta = time.delta_secs();
    let now = time.elapsed_secs();

    let mut order: Vec<Entity> = detectors.iter().map(|(entity, ..)| entity).collect();
    order.sort();
    missing_targets.retain_alive(|entity| order.binary_search(&entity).is_ok());

    for entity in order {
        let Ok((_, mut detector, mut transform, mut nav, config)) = detectors.get_mut(entity) else {
            continue;
        };

        let target = detector.target();
        let Ok((target_transform, stealth, target_body)) = targets.get(target) else {
            if missing_targets.report(entity) {
                crate::log_warning(&format!(
                    "Detector {:?}: target {:?} missing, skipping",
                    entity, target
                ));
            }
            continue;
        };
        missing_targets.resolve(entity);

        let view = TargetView {
            entity: target,
            position: target_transform.translation,
            body: target_body.copied(),
            stealth: stealth.clone(),
        };
        let route = detector.route().and_then(|route| routes.get(route).ok());
        let is_target = |hit: Entity| is_part_of(hit, target, &parents);

        let ctx = TickContext {
            delta,
            now,
            config,
            route,
            target: &view,
            queries: &queries,
            is_target: &is_target,
        };
        let mut body = AgentBody {
            transform: &mut transform,
            nav: &mut nav,
        };

        let mut signals = Vec::new();
        detector.tick(&mut body, &ctx, &mut rng.rng, &mut signals);
        events.publish_all(entity, signals);
    }
}
