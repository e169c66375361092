//! StealthState - скрытность преследуемого агента (darkness / crouch / noise).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::zones::ZoneOccupancy;

/// Максимальный уровень темноты (полностью невидим)
pub const MAX_DARKNESS: u8 = 2;

/// Категория шума от движения, упорядочена по громкости
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Reflect, Serialize, Deserialize,
)]
pub enum MovementNoise {
    #[default]
    Silent = 0,
    Crouch = 1,
    Walk = 2,
    Run = 3,
}

impl MovementNoise {
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Silent),
            1 => Some(Self::Crouch),
            2 => Some(Self::Walk),
            3 => Some(Self::Run),
            _ => None,
        }
    }
}

/// Stealth state цели
///
/// Инвариант: darkness_level ∈ [0, 2].
/// movement_noise и is_crouching могут расходиться: SetMovementNoise(Walk)
/// после приседа оставляет is_crouching = true.
#[derive(Component, Debug, Clone, PartialEq, Default, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[require(ZoneOccupancy)]
#[serde(from = "StealthStateData")]
pub struct StealthState {
    darkness_level: u8,
    movement_noise: MovementNoise,
    is_crouching: bool,
}

/// Сырые данные из level file (darkness ещё не зажат в [0, 2])
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct StealthStateData {
    darkness_level: i32,
    movement_noise: MovementNoise,
    is_crouching: bool,
}

impl From<StealthStateData> for StealthState {
    fn from(data: StealthStateData) -> Self {
        let mut state = Self {
            darkness_level: 0,
            movement_noise: data.movement_noise,
            is_crouching: data.is_crouching,
        };
        state.set_darkness(data.darkness_level);
        state
    }
}

impl StealthState {
    pub fn darkness_level(&self) -> u8 {
        self.darkness_level
    }

    pub fn movement_noise(&self) -> MovementNoise {
        self.movement_noise
    }

    pub fn is_crouching(&self) -> bool {
        self.is_crouching
    }

    /// Last writer wins (зоны резолвятся до записи, см. zones::apply_dark_zones)
    pub fn set_darkness(&mut self, level: i32) {
        self.darkness_level = level.clamp(0, MAX_DARKNESS as i32) as u8;
    }

    /// Присед → Crouch, встал → Silent (даже если агент в этот момент бежит)
    pub fn set_crouch(&mut self, crouch: bool) {
        self.is_crouching = crouch;
        self.movement_noise = if crouch {
            MovementNoise::Crouch
        } else {
            MovementNoise::Silent
        };
    }

    /// Crouch форсит is_crouching = true; остальные значения флаг НЕ сбрасывают
    pub fn set_movement_noise(&mut self, noise: MovementNoise) {
        self.movement_noise = noise;
        if noise == MovementNoise::Crouch {
            self.is_crouching = true;
        }
    }

    pub fn is_fully_hidden(&self) -> bool {
        self.darkness_level >= MAX_DARKNESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_darkness_is_clamped() {
        let mut stealth = StealthState::default();

        stealth.set_darkness(5);
        assert_eq!(stealth.darkness_level(), 2);
        assert!(stealth.is_fully_hidden());

        stealth.set_darkness(-3);
        assert_eq!(stealth.darkness_level(), 0);

        stealth.set_darkness(1);
        assert_eq!(stealth.darkness_level(), 1);
    }

    #[test]
    fn test_deserialize_clamps_darkness() {
        let state: StealthState = serde_json::from_str(r#"{ "darkness_level": 7 }"#).unwrap();
        assert_eq!(state.darkness_level(), MAX_DARKNESS);

        let state: StealthState = serde_json::from_str(r#"{ "darkness_level": -4 }"#).unwrap();
        assert_eq!(state.darkness_level(), 0);

        let state: StealthState = serde_json::from_str(
            r#"{ "darkness_level": 1, "movement_noise": "Walk", "is_crouching": true }"#,
        )
        .unwrap();
        assert_eq!(state.darkness_level(), 1);
        assert_eq!(state.movement_noise(), MovementNoise::Walk);
        assert!(state.is_crouching());
    }

    #[test]
    fn test_crouch_sets_noise() {
        let mut stealth = StealthState::default();

        stealth.set_crouch(true);
        assert!(stealth.is_crouching());
        assert_eq!(stealth.movement_noise(), MovementNoise::Crouch);

        stealth.set_movement_noise(MovementNoise::Run);
        stealth.set_crouch(false);
        assert!(!stealth.is_crouching());
        assert_eq!(stealth.movement_noise(), MovementNoise::Silent);
    }

    #[test]
    fn test_noise_does_not_clear_crouch_flag() {
        let mut stealth = StealthState::default();

        stealth.set_crouch(true);
        stealth.set_movement_noise(MovementNoise::Walk);

        // Асимметрия сохраняется намеренно: флаг остаётся true
        assert!(stealth.is_crouching());
        assert_eq!(stealth.movement_noise(), MovementNoise::Walk);
    }

    #[test]
    fn test_crouch_noise_forces_crouch_flag() {
        let mut stealth = StealthState::default();
        stealth.set_movement_noise(MovementNoise::Crouch);
        assert!(stealth.is_crouching());
    }

    #[test]
    fn test_noise_ordering() {
        assert!(MovementNoise::Silent < MovementNoise::Crouch);
        assert!(MovementNoise::Walk < MovementNoise::Run);
        assert_eq!(MovementNoise::from_ordinal(2), Some(MovementNoise::Walk));
        assert_eq!(MovementNoise::from_ordinal(4), None);
        assert_eq!(MovementNoise::Run.ordinal(), 3);
    }
}
