//! Detector - accumulator + Patrol/Alerting/Chase state machine.
//!
//! Данные и переходы живут здесь, покадровое поведение в `ai::brain`.
//! Все активности (ожидание на точке, рывок, chase-end) - явные таймеры,
//! отмена = сброс поля.

use bevy::prelude::*;

use super::config::DetectorConfig;
use crate::movement::{Dash, NavAgent};
use crate::shared::Countdown;
use crate::stealth::{MovementNoise, NoiseEvent};

/// Погрешность накопления float при сравнении с порогом (60 Hz × N тиков)
pub const DETECTION_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum DetectorState {
    #[default]
    Patrol,
    Alerting,
    Chase,
}

/// Что произошло за тик (system конвертирует в Bevy events)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectorSignal {
    StateChanged {
        from: DetectorState,
        to: DetectorState,
    },
    NoiseHeard {
        origin: Vec3,
        loudness: MovementNoise,
    },
    DashStarted {
        from: Vec3,
        to: Vec3,
    },
    DashFinished {
        /// true = прерван сменой состояния или поимкой
        interrupted: bool,
    },
    Captured {
        target: Entity,
    },
}

/// AI-преследователь (один на entity)
///
/// Инварианты:
/// - detection ∈ [0, max_detection_value]
/// - после `captured` detector заморожен навсегда
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform, NavAgent, DetectorConfig)]
pub struct Detector {
    target: Entity,
    route: Option<Entity>,
    pub(crate) state: DetectorState,
    pub(crate) detection: f32,
    pub(crate) last_seen_at: Option<f32>,
    pub(crate) last_known_position: Option<Vec3>,

    // Patrol
    pub(crate) patrol_index: usize,
    /// Нужно (пере)выставить destination на текущую точку маршрута
    pub(crate) route_dirty: bool,
    pub(crate) waypoint_wait: Option<Countdown>,
    /// Планируется лениво на первом тике патруля (нужен RNG)
    pub(crate) patrol_dash: Option<Countdown>,

    // Chase
    pub(crate) chase_dash: Option<Countdown>,
    pub(crate) chase_end: Option<Countdown>,

    pub(crate) dash: Option<Dash>,
    pub(crate) captured: bool,
}

impl Detector {
    pub fn new(target: Entity, route: Option<Entity>) -> Self {
        Self {
            target,
            route,
            state: DetectorState::Patrol,
            detection: 0.0,
            last_seen_at: None,
            last_known_position: None,
            patrol_index: 0,
            route_dirty: true,
            waypoint_wait: None,
            patrol_dash: None,
            chase_dash: None,
            chase_end: None,
            dash: None,
            captured: false,
        }
    }

    pub fn target(&self) -> Entity {
        self.target
    }

    pub fn route(&self) -> Option<Entity> {
        self.route
    }

    pub fn state(&self) -> DetectorState {
        self.state
    }

    pub fn detection(&self) -> f32 {
        self.detection
    }

    pub fn last_seen_at(&self) -> Option<f32> {
        self.last_seen_at
    }

    pub fn last_known_position(&self) -> Option<Vec3> {
        self.last_known_position
    }

    pub fn patrol_index(&self) -> usize {
        self.patrol_index
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.is_some()
    }

    pub fn is_waiting(&self) -> bool {
        self.waypoint_wait.is_some()
    }

    /// Идёт отсчёт chase-end (accumulator упал до 0, ждём возврата в патруль)
    pub fn is_ending_chase(&self) -> bool {
        self.chase_end.is_some()
    }

    pub fn reached_threshold(&self, config: &DetectorConfig) -> bool {
        self.detection + DETECTION_EPSILON >= config.detection_threshold
    }

    pub(crate) fn seconds_unseen(&self, now: f32) -> f32 {
        self.last_seen_at.map_or(f32::INFINITY, |seen| now - seen)
    }

    pub(crate) fn grow(&mut self, amount: f32, config: &DetectorConfig) {
        // clamp паникует при NaN max
        self.detection = (self.detection + amount)
            .min(config.max_detection_value)
            .max(0.0);
    }

    pub(crate) fn decay(&mut self, amount: f32) {
        self.detection = (self.detection - amount).max(0.0);
    }

    /// Переход состояния. Прерывает рывок и ожидание на точке.
    pub(crate) fn set_state(
        &mut self,
        to: DetectorState,
        nav: &mut NavAgent,
        signals: &mut Vec<DetectorSignal>,
    ) {
        if self.state == to {
            return;
        }

        self.cancel_dash(nav, signals);
        self.waypoint_wait = None;

        match to {
            DetectorState::Patrol => {
                // Возобновить маршрут с той же точки
                self.route_dirty = true;
                self.chase_end = None;
            }
            DetectorState::Chase => {
                self.chase_dash = None;
            }
            DetectorState::Alerting => {}
        }

        let from = self.state;
        self.state = to;
        signals.push(DetectorSignal::StateChanged { from, to });
    }

    /// Рывок прерывается там, где был на последнем тике
    pub(crate) fn cancel_dash(&mut self, nav: &mut NavAgent, signals: &mut Vec<DetectorSignal>) {
        if self.dash.take().is_some() {
            nav.resume();
            signals.push(DetectorSignal::DashFinished { interrupted: true });
        }
    }

    /// Услышал (шаги цели или внешний шум) → немедленный Chase
    pub(crate) fn on_heard(
        &mut self,
        origin: Vec3,
        loudness: MovementNoise,
        now: f32,
        config: &DetectorConfig,
        nav: &mut NavAgent,
        signals: &mut Vec<DetectorSignal>,
    ) {
        self.detection = config.detection_threshold.min(config.max_detection_value);
        self.last_seen_at = Some(now);
        self.last_known_position = Some(origin);
        self.set_state(DetectorState::Chase, nav, signals);
        signals.push(DetectorSignal::NoiseHeard { origin, loudness });
    }

    /// Внешний шум. Возвращает true если detector на него среагировал.
    ///
    /// Нужно оказаться и в радиусе шума, и в собственном hearing_radius.
    pub fn hear_noise(
        &mut self,
        noise: &NoiseEvent,
        listener: Vec3,
        now: f32,
        config: &DetectorConfig,
        nav: &mut NavAgent,
        signals: &mut Vec<DetectorSignal>,
    ) -> bool {
        if self.captured {
            return false;
        }

        let distance = listener.distance(noise.origin);
        if distance > noise.radius
            || distance > config.hearing_radius
            || noise.loudness < config.hearing_threshold
        {
            return false;
        }

        self.on_heard(noise.origin, noise.loudness, now, config, nav, signals);
        true
    }
}
