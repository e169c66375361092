//! AI systems

pub mod detection;
pub mod hearing;

pub use detection::*;
pub use hearing::*;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::components::DetectorSignal;
use super::events::{Captured, DashFinished, DashStarted, DetectorStateChanged, NoiseHeard};

/// Writer'ы всех событий detector'а + лог
#[derive(SystemParam)]
pub struct DetectorEvents<'w> {
    state_changed: EventWriter<'w, DetectorStateChanged>,
    heard: EventWriter<'w, NoiseHeard>,
    dash_started: EventWriter<'w, DashStarted>,
    dash_finished: EventWriter<'w, DashFinished>,
    captured: EventWriter<'w, Captured>,
}

impl DetectorEvents<'_> {
    pub fn publish_all(&mut self, detector: Entity, signals: impl IntoIterator<Item = DetectorSignal>) {
        for signal in signals {
            self.publish(detector, signal);
        }
    }

    pub fn publish(&mut self, detector: Entity, signal: DetectorSignal) {
        log_signal(detector, &signal);

        match signal {
            DetectorSignal::StateChanged { from, to } => {
                self.state_changed
                    .write(DetectorStateChanged { detector, from, to });
            }
            DetectorSignal::NoiseHeard { origin, loudness } => {
                self.heard.write(NoiseHeard {
                    detector,
                    origin,
                    loudness,
                });
            }
            DetectorSignal::DashStarted { from, to } => {
                self.dash_started.write(DashStarted { detector, from, to });
            }
            DetectorSignal::DashFinished { interrupted } => {
                self.dash_finished.write(DashFinished {
                    detector,
                    interrupted,
                });
            }
            DetectorSignal::Captured { target } => {
                self.captured.write(Captured { detector, target });
            }
        }
    }
}

/// Вариант для прямых вызовов через &mut World (emit_noise)
pub(crate) fn publish_to_world(world: &mut World, detector: Entity, signal: DetectorSignal) {
    log_signal(detector, &signal);

    match signal {
        DetectorSignal::StateChanged { from, to } => {
            world.send_event(DetectorStateChanged { detector, from, to });
        }
        DetectorSignal::NoiseHeard { origin, loudness } => {
            world.send_event(NoiseHeard {
                detector,
                origin,
                loudness,
            });
        }
        DetectorSignal::DashStarted { from, to } => {
            world.send_event(DashStarted { detector, from, to });
        }
        DetectorSignal::DashFinished { interrupted } => {
            world.send_event(DashFinished {
                detector,
                interrupted,
            });
        }
        DetectorSignal::Captured { target } => {
            world.send_event(Captured { detector, target });
        }
    }
}

fn log_signal(detector: Entity, signal: &DetectorSignal) {
    match signal {
        DetectorSignal::StateChanged { from, to } => {
            crate::log_info(&format!("🎯 {:?} {:?} → {:?}", detector, from, to));
        }
        DetectorSignal::NoiseHeard { origin, loudness } => {
            crate::log(&format!("👂 {:?} heard {:?} at {:?}", detector, loudness, origin));
        }
        DetectorSignal::DashStarted { from, to } => {
            crate::log(&format!("💨 {:?} dash {:?} → {:?}", detector, from, to));
        }
        DetectorSignal::DashFinished { interrupted } => {
            if *interrupted {
                crate::log(&format!("💨 {:?} dash interrupted", detector));
            }
        }
        DetectorSignal::Captured { target } => {
            crate::log_info(&format!("🚨 {:?} captured {:?}", detector, target));
        }
    }
}
