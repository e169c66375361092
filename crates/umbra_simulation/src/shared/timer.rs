//! Countdown - таймер активности, продвигаемый каждый тик.
//!
//! Заменяет WaitForSeconds-корутины: состояние явное, отмена = сброс поля.

use bevy::prelude::*;

/// Погрешность float-накопления delta (60 Hz × N тиков)
pub const TIMER_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
        }
    }

    /// Продвинуть таймер. Возвращает true если таймер истёк (на этом или раньше).
    pub fn tick(&mut self, delta: f32) -> bool {
        self.remaining = (self.remaining - delta).max(0.0);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.remaining <= TIMER_EPSILON
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}
