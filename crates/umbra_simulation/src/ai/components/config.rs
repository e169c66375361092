//! DetectorConfig - все тюнинги detector'а (inspector defaults из уровня).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::stealth::MovementNoise;

/// Множители роста detection по шуму цели: growth × (1 + mult)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseMultipliers {
    pub silent: f32,
    pub crouch: f32,
    pub walk: f32,
    pub run: f32,
}

impl Default for NoiseMultipliers {
    fn default() -> Self {
        Self {
            silent: 0.0,
            crouch: 0.4,
            walk: 1.0,
            run: 1.5,
        }
    }
}

impl NoiseMultipliers {
    pub fn get(&self, noise: MovementNoise) -> f32 {
        match noise {
            MovementNoise::Silent => self.silent,
            MovementNoise::Crouch => self.crouch,
            MovementNoise::Walk => self.walk,
            MovementNoise::Run => self.run,
        }
    }
}

/// Множители роста по darkness_level цели (dark = 2 до роста не доходит, vision пропускается)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct DarknessMultipliers {
    pub lit: f32,
    pub dim: f32,
    pub dark: f32,
}

impl Default for DarknessMultipliers {
    fn default() -> Self {
        Self {
            lit: 1.0,
            dim: 0.5,
            dark: 0.0,
        }
    }
}

impl DarknessMultipliers {
    pub fn get(&self, darkness_level: u8) -> f32 {
        match darkness_level {
            0 => self.lit,
            1 => self.dim,
            _ => self.dark,
        }
    }
}

/// Конфигурация detector'а
///
/// Единицы: метры, секунды, градусы. Скорости detection - единиц/сек.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct DetectorConfig {
    // Accumulator
    pub detection_threshold: f32,
    pub max_detection_value: f32,
    pub base_detection_per_second: f32,
    pub decay_per_second: f32,
    pub lose_sight_timeout: f32,

    // Vision
    pub vision_range: f32,
    /// Полный угол конуса (градусы)
    pub vision_fov: f32,
    pub eye_height: f32,

    // Hearing
    pub hearing_radius: f32,
    pub hearing_threshold: MovementNoise,

    pub noise_multipliers: NoiseMultipliers,
    pub darkness_multipliers: DarknessMultipliers,

    // Motion
    pub patrol_speed: f32,
    pub chase_speed: f32,
    pub patrol_dash_interval_min: f32,
    pub patrol_dash_interval_max: f32,
    pub patrol_dash_distance: f32,
    pub patrol_dash_duration: f32,
    pub chase_dash_interval: f32,
    pub chase_dash_distance: f32,
    pub chase_dash_duration: f32,
    /// Радиус поиска проходимой точки для приземления рывка
    pub dash_sample_radius: f32,
    pub waypoint_arrival_distance: f32,
    /// Градусы/сек
    pub alert_turn_speed: f32,
    /// Градусы/сек
    pub chase_turn_speed: f32,

    // Outcome
    pub attack_distance: f32,
    pub chase_end_wait: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            detection_threshold: 100.0,
            max_detection_value: 150.0,
            base_detection_per_second: 25.0,
            decay_per_second: 30.0,
            lose_sight_timeout: 6.0,

            vision_range: 8.0,
            vision_fov: 60.0,
            eye_height: 1.2,

            hearing_radius: 4.0,
            hearing_threshold: MovementNoise::Walk,

            noise_multipliers: NoiseMultipliers::default(),
            darkness_multipliers: DarknessMultipliers::default(),

            patrol_speed: 1.5,
            chase_speed: 1.5,
            patrol_dash_interval_min: 10.0,
            patrol_dash_interval_max: 15.0,
            patrol_dash_distance: 1.0,
            patrol_dash_duration: 0.18,
            chase_dash_interval: 2.0,
            chase_dash_distance: 3.0,
            chase_dash_duration: 0.2,
            dash_sample_radius: 1.0,
            waypoint_arrival_distance: 0.35,
            alert_turn_speed: 120.0,
            chase_turn_speed: 360.0,

            attack_distance: 1.0,
            chase_end_wait: 2.0,
        }
    }
}

impl DetectorConfig {
    /// Парсинг + валидация (level file может переопределить часть полей)
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        let invalid = |message: String| Err(SetupError::InvalidConfig(message));

        // NaN/inf отсекаем до сравнений
        let noise = &self.noise_multipliers;
        let darkness = &self.darkness_multipliers;
        let all = [
            ("detection_threshold", self.detection_threshold),
            ("max_detection_value", self.max_detection_value),
            ("base_detection_per_second", self.base_detection_per_second),
            ("decay_per_second", self.decay_per_second),
            ("lose_sight_timeout", self.lose_sight_timeout),
            ("vision_range", self.vision_range),
            ("vision_fov", self.vision_fov),
            ("eye_height", self.eye_height),
            ("hearing_radius", self.hearing_radius),
            ("noise_multipliers.silent", noise.silent),
            ("noise_multipliers.crouch", noise.crouch),
            ("noise_multipliers.walk", noise.walk),
            ("noise_multipliers.run", noise.run),
            ("darkness_multipliers.lit", darkness.lit),
            ("darkness_multipliers.dim", darkness.dim),
            ("darkness_multipliers.dark", darkness.dark),
            ("patrol_speed", self.patrol_speed),
            ("chase_speed", self.chase_speed),
            ("patrol_dash_interval_min", self.patrol_dash_interval_min),
            ("patrol_dash_interval_max", self.patrol_dash_interval_max),
            ("patrol_dash_distance", self.patrol_dash_distance),
            ("patrol_dash_duration", self.patrol_dash_duration),
            ("chase_dash_interval", self.chase_dash_interval),
            ("chase_dash_distance", self.chase_dash_distance),
            ("chase_dash_duration", self.chase_dash_duration),
            ("dash_sample_radius", self.dash_sample_radius),
            ("waypoint_arrival_distance", self.waypoint_arrival_distance),
            ("alert_turn_speed", self.alert_turn_speed),
            ("chase_turn_speed", self.chase_turn_speed),
            ("attack_distance", self.attack_distance),
            ("chase_end_wait", self.chase_end_wait),
        ];
        if let Some((name, value)) = all.iter().find(|(_, value)| !value.is_finite()) {
            return invalid(format!("{name} must be finite, got {value}"));
        }

        if self.detection_threshold <= 0.0 {
            return invalid(format!(
                "detection_threshold must be positive, got {}",
                self.detection_threshold
            ));
        }
        if self.detection_threshold > self.max_detection_value {
            return invalid(format!(
                "detection_threshold {} exceeds max_detection_value {}",
                self.detection_threshold, self.max_detection_value
            ));
        }

        let non_negative = [
            ("base_detection_per_second", self.base_detection_per_second),
            ("decay_per_second", self.decay_per_second),
            ("lose_sight_timeout", self.lose_sight_timeout),
            ("vision_range", self.vision_range),
            ("hearing_radius", self.hearing_radius),
            ("patrol_speed", self.patrol_speed),
            ("chase_speed", self.chase_speed),
            ("patrol_dash_interval_min", self.patrol_dash_interval_min),
            ("patrol_dash_distance", self.patrol_dash_distance),
            ("chase_dash_interval", self.chase_dash_interval),
            ("chase_dash_distance", self.chase_dash_distance),
            ("dash_sample_radius", self.dash_sample_radius),
            ("waypoint_arrival_distance", self.waypoint_arrival_distance),
            ("alert_turn_speed", self.alert_turn_speed),
            ("chase_turn_speed", self.chase_turn_speed),
            ("attack_distance", self.attack_distance),
            ("chase_end_wait", self.chase_end_wait),
        ];
        if let Some((name, value)) = non_negative.iter().find(|(_, value)| *value < 0.0) {
            return invalid(format!("{name} must be non-negative, got {value}"));
        }

        if self.patrol_dash_interval_min > self.patrol_dash_interval_max {
            return invalid(format!(
                "patrol dash interval min {} exceeds max {}",
                self.patrol_dash_interval_min, self.patrol_dash_interval_max
            ));
        }
        if self.patrol_dash_duration <= 0.0 || self.chase_dash_duration <= 0.0 {
            return invalid("dash durations must be positive".to_string());
        }
        if !(0.0..=360.0).contains(&self.vision_fov) {
            return invalid(format!("vision_fov must be within [0, 360], got {}", self.vision_fov));
        }

        Ok(())
    }
}
