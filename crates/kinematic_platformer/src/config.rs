//! Tunables контроллера (designer-facing параметры)
//!
//! Immutable для core: контроллер только читает их.
//! Gravity и jump speed не хранятся — выводятся из высоты и времени прыжка.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision_layers::GROUND_FILTER_DEFAULT;
use crate::error::ConfigError;

/// Параметры движения персонажа
///
/// Единицы: world units (метры), секунды.
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTunables {
    /// Максимальная горизонтальная скорость на земле (units/s)
    pub ground_max_speed: f32,
    /// Горизонтальное ускорение (units/s²)
    pub ground_acceleration: f32,
    /// Reserved: отдельного эффекта пока нет, см. DESIGN.md
    pub ground_deceleration: f32,
    /// Высота апекса прыжка (units)
    pub max_jump_height: f32,
    /// Время до апекса (секунды)
    pub jump_peak_time: f32,
    /// Торможение подъёма при отпущенном прыжке (units/s²)
    pub jump_abort_deceleration: f32,
    /// Доля высоты collider'а в приседе, (0, 1]
    pub crouch_height_percent: f32,
    /// Доля max speed в приседе, [0, 1]
    pub crouch_speed_percent: f32,
    /// Битовая маска слоёв, которые probe считает землёй/потолком
    pub ground_layers: u32,
    /// Запас длины probe-лучей
    pub grounded_raycast_distance: f32,
    /// false = прыжок срабатывает всегда (поведение без eligibility gate)
    pub jump_requires_ground: bool,
}

impl Default for MovementTunables {
    fn default() -> Self {
        Self {
            ground_max_speed: 7.0,
            ground_acceleration: 100.0,
            ground_deceleration: 50.0,
            max_jump_height: 4.0,
            jump_peak_time: 0.4,
            jump_abort_deceleration: 100.0,
            crouch_height_percent: 0.5,
            crouch_speed_percent: 0.3,
            ground_layers: GROUND_FILTER_DEFAULT,
            grounded_raycast_distance: 0.1,
            jump_requires_ground: true,
        }
    }
}

impl MovementTunables {
    /// Парсит JSON (отсутствующие поля = default) и валидирует
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tunables: Self = serde_json::from_str(json)?;
        tunables.validate()?;
        Ok(tunables)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check(
            "crouch_height_percent",
            self.crouch_height_percent,
            self.crouch_height_percent > 0.0 && self.crouch_height_percent <= 1.0,
            "(0, 1]",
        )?;
        check(
            "crouch_speed_percent",
            self.crouch_speed_percent,
            (0.0..=1.0).contains(&self.crouch_speed_percent),
            "[0, 1]",
        )?;
        check("max_jump_height", self.max_jump_height, self.max_jump_height > 0.0, "> 0")?;
        check("jump_peak_time", self.jump_peak_time, self.jump_peak_time > 0.0, "> 0")?;
        check("ground_max_speed", self.ground_max_speed, self.ground_max_speed >= 0.0, ">= 0")?;
        check(
            "ground_acceleration",
            self.ground_acceleration,
            self.ground_acceleration >= 0.0,
            ">= 0",
        )?;
        check(
            "ground_deceleration",
            self.ground_deceleration,
            self.ground_deceleration >= 0.0,
            ">= 0",
        )?;
        check(
            "jump_abort_deceleration",
            self.jump_abort_deceleration,
            self.jump_abort_deceleration >= 0.0,
            ">= 0",
        )?;
        check(
            "grounded_raycast_distance",
            self.grounded_raycast_distance,
            self.grounded_raycast_distance >= 0.0,
            ">= 0",
        )?;
        Ok(())
    }

    /// `gravity = 2h / t²`
    pub fn gravity(&self) -> f32 {
        self.max_jump_height * 2.0 / (self.jump_peak_time * self.jump_peak_time)
    }

    /// Начальная скорость, дающая апекс `h` за время `t`
    pub fn jump_speed(&self) -> f32 {
        self.gravity() * self.jump_peak_time
    }
}

fn check(field: &'static str, value: f32, ok: bool, expected: &'static str) -> Result<(), ConfigError> {
    // NaN не проходит ни одно сравнение → тоже OutOfRange
    if ok {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value, expected })
    }
}
