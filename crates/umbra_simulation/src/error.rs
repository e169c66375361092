//! Setup errors - fail fast при спавне detector'ов и загрузке конфигов.
//!
//! Runtime-тик ошибок не возвращает: всё, что могло быть невалидным,
//! отсекается здесь один раз.

use bevy::prelude::Entity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("target entity {0:?} does not exist")]
    MissingTarget(Entity),

    #[error("target entity {0:?} has no StealthState")]
    TargetWithoutStealth(Entity),

    #[error("target entity {0:?} has no Transform")]
    TargetWithoutTransform(Entity),

    #[error("target entity {0:?} is itself a detector")]
    TargetIsDetector(Entity),

    #[error("route entity {0:?} has no PatrolRoute")]
    MissingRoute(Entity),

    #[error("invalid detector config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse detector config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
