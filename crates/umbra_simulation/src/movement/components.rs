//! Movement компоненты: NavAgent и маркер headless навигации

use bevy::prelude::*;

/// Path-following агент (выполняется navigation layer движка)
///
/// Архитектура:
/// - ECS пишет intent: destination, speed, stop/resume, update_rotation
/// - Движок строит путь и отчитывается через `report_path`
/// - Поворот при update_rotation = false делает AI сам (rotate_towards)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    destination: Option<Vec3>,
    /// Скорость движения (м/с)
    pub speed: f32,
    /// Автоматический поворот по направлению движения
    pub update_rotation: bool,
    is_stopped: bool,
    remaining_distance: f32,
    path_pending: bool,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            destination: None,
            speed: 1.5,
            update_rotation: true,
            is_stopped: false,
            remaining_distance: 0.0,
            path_pending: false,
        }
    }
}

impl NavAgent {
    /// Новая цель → путь пересчитывается (pending до следующего report_path)
    pub fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
        self.path_pending = true;
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn stop(&mut self) {
        self.is_stopped = true;
    }

    pub fn resume(&mut self) {
        self.is_stopped = false;
    }

    pub fn is_stopped(&self) -> bool {
        self.is_stopped
    }

    pub fn remaining_distance(&self) -> f32 {
        self.remaining_distance
    }

    pub fn is_path_pending(&self) -> bool {
        self.path_pending
    }

    /// Engine layer: путь построен, осталось `remaining` метров
    pub fn report_path(&mut self, remaining: f32) {
        self.remaining_distance = remaining.max(0.0);
        self.path_pending = false;
    }
}

/// Маркер: NavAgent'ов двигает headless driver, а не движок
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct HeadlessNavigation;
