//! Ошибки контроллера
//!
//! Только setup-time ошибки: per-tick операции тотальны (пустой мир = 0 hits, не ошибка).

use thiserror::Error;

/// Collider, для которого нет shape adapter (поддерживаются только capsule и box)
///
/// Configuration defect: персонаж с таким collider не создаётся.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no collider shape adapter for shape kind: {kind}")]
pub struct UnsupportedShapeError {
    pub kind: String,
}

impl UnsupportedShapeError {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

/// Ошибки загрузки/валидации `MovementTunables`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse movement tunables: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tunable `{field}` out of range: {value} (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        expected: &'static str,
    },
}

/// Ошибки создания персонажа: неподдерживаемый collider или невалидные tunables
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error(transparent)]
    Shape(#[from] UnsupportedShapeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
