//! Dark zones - environment → StealthState.darkness_level
//!
//! Зона с level ≥ 1 даёт оккупанту darkness 1 (стоя) или 2 (в приседе).
//! Зона с level 0 ничего не делает.
//!
//! Перекрытия: берём максимум по всем активным зонам, в которых стоит агент
//! (детерминированно, не зависит от порядка итерации).
//! Вышел из всех зон (или все его зоны выключены циклом) → darkness = 0.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::state::StealthState;
use crate::shared::Countdown;

/// Тёмная зона (box volume вокруг Transform.translation)
#[derive(Component, Debug, Clone, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct DarkZone {
    /// 0 = не тёмная, ≥1 = тёмная (итоговый уровень зависит от приседа)
    pub level: u8,
    /// Половина размеров trigger volume (метры)
    pub half_extents: Vec3,
}

impl Default for DarkZone {
    fn default() -> Self {
        Self {
            level: 2,
            half_extents: Vec3::splat(1.0),
        }
    }
}

impl DarkZone {
    pub fn contains(&self, center: Vec3, point: Vec3) -> bool {
        let local = (point - center).abs();
        local.x <= self.half_extents.x
            && local.y <= self.half_extents.y
            && local.z <= self.half_extents.z
    }
}

/// Цикл включения/выключения зоны (мигающий свет).
///
/// Стартует во включённом состоянии: on_seconds активна, off_seconds нет, по кругу.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ZoneCycle {
    pub on_seconds: f32,
    pub off_seconds: f32,
    active: bool,
    phase: Countdown,
}

impl ZoneCycle {
    pub fn new(on_seconds: f32, off_seconds: f32) -> Self {
        Self {
            on_seconds: on_seconds.max(0.0),
            off_seconds: off_seconds.max(0.0),
            active: true,
            phase: Countdown::new(on_seconds),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Продвинуть цикл. Возвращает true если на этом тике сменилась фаза.
    pub fn advance(&mut self, delta: f32) -> bool {
        if !self.phase.tick(delta) {
            return false;
        }

        self.active = !self.active;
        let next = if self.active {
            self.on_seconds
        } else {
            self.off_seconds
        };
        self.phase = Countdown::new(next);
        true
    }
}

/// Находится ли агент сейчас внутри хотя бы одной активной зоны.
///
/// Нужен чтобы отличить "вышел из зоны" (сбросить в 0) от "никогда не был
/// в зоне" (не трогать darkness, выставленный вручную).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ZoneOccupancy {
    pub inside: bool,
}

/// Вклад одной зоны в darkness оккупанта
pub fn zone_contribution(zone_level: u8, crouching: bool) -> Option<u8> {
    if zone_level == 0 {
        return None;
    }
    Some(if crouching { 2 } else { 1 })
}

/// Максимум по вкладам. None = агент не внутри ни одной действующей зоны.
pub fn resolve_zone_darkness(contributions: impl IntoIterator<Item = u8>) -> Option<u8> {
    contributions.into_iter().max()
}

/// Система: продвижение циклов зон
pub fn tick_zone_cycles(mut zones: Query<(Entity, &mut ZoneCycle)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (entity, mut cycle) in zones.iter_mut() {
        if cycle.advance(delta) {
            crate::log(&format!(
                "DarkZone {:?} → {}",
                entity,
                if cycle.is_active() { "on" } else { "off" }
            ));
        }
    }
}

/// Система: применение зон к StealthState
pub fn apply_dark_zones(
    zones: Query<(&DarkZone, &Transform, Option<&ZoneCycle>)>,
    mut occupants: Query<(&Transform, &mut StealthState, &mut ZoneOccupancy)>,
) {
    for (transform, mut stealth, mut occupancy) in occupants.iter_mut() {
        let crouching = stealth.is_crouching();
        let position = transform.translation;

        let resolved = resolve_zone_darkness(
            zones
                .iter()
                .filter(|(_, _, cycle)| cycle.is_none_or(|c| c.is_active()))
                .filter(|(zone, zone_tf, _)| zone.contains(zone_tf.translation, position))
                .filter_map(|(zone, _, _)| zone_contribution(zone.level, crouching)),
        );

        match resolved {
            Some(level) => {
                if stealth.darkness_level() != level {
                    stealth.set_darkness(level as i32);
                }
                occupancy.inside = true;
            }
            None if occupancy.inside => {
                stealth.set_darkness(0);
                occupancy.inside = false;
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_contribution_depends_on_crouch() {
        assert_eq!(zone_contribution(0, true), None);
        assert_eq!(zone_contribution(1, false), Some(1));
        assert_eq!(zone_contribution(1, true), Some(2));
        assert_eq!(zone_contribution(2, false), Some(1));
    }

    #[test]
    fn test_overlap_resolves_to_max() {
        assert_eq!(resolve_zone_darkness([1, 2, 1]), Some(2));
        assert_eq!(resolve_zone_darkness([2, 1]), Some(2));
        assert_eq!(resolve_zone_darkness(Vec::<u8>::new()), None);
    }

    #[test]
    fn test_zone_contains() {
        let zone = DarkZone {
            level: 2,
            half_extents: Vec3::new(2.0, 1.0, 2.0),
        };
        let center = Vec3::new(10.0, 0.0, 0.0);
        assert!(zone.contains(center, Vec3::new(11.5, 0.5, -1.0)));
        assert!(!zone.contains(center, Vec3::new(12.5, 0.5, 0.0)));
    }

    #[test]
    fn test_zone_cycle_toggles() {
        let mut cycle = ZoneCycle::new(1.0, 0.5);
        assert!(cycle.is_active());

        // 1.0s включена
        for _ in 0..9 {
            assert!(!cycle.advance(0.1));
        }
        assert!(cycle.advance(0.1));
        assert!(!cycle.is_active());

        // 0.5s выключена
        for _ in 0..4 {
            assert!(!cycle.advance(0.1));
        }
        assert!(cycle.advance(0.1));
        assert!(cycle.is_active());
    }
}
