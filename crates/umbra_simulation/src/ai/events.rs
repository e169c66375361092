//! AI Events - выходы detector'а для внешних коллабораторов
//!
//! Аудио (chase music, шаги), VFX рывков, катсцена поимки подписываются
//! на эти события; симуляция о них ничего не знает.

use bevy::prelude::*;

use super::components::DetectorState;
use crate::stealth::MovementNoise;

/// Смена состояния (OnEnterPatrol / OnEnterAlerting / OnEnterChase)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DetectorStateChanged {
    pub detector: Entity,
    pub from: DetectorState,
    pub to: DetectorState,
}

/// Detector услышал шаги цели или внешний шум
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct NoiseHeard {
    pub detector: Entity,
    pub origin: Vec3,
    pub loudness: MovementNoise,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DashStarted {
    pub detector: Entity,
    pub from: Vec3,
    pub to: Vec3,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DashFinished {
    pub detector: Entity,
    /// Прерван сменой состояния или поимкой (остался на последней позиции)
    pub interrupted: bool,
}

/// Поимка цели. Ровно один раз на detector.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct Captured {
    pub detector: Entity,
    pub target: Entity,
}
