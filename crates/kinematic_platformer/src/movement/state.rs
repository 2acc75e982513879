//! MovementState — per-character состояние контроллера

use bevy::prelude::*;

/// Направление взгляда персонажа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }
}

/// Состояние движения (одно на персонажа)
///
/// Инварианты:
/// - grounded && !ascending после fixed tick ⇒ velocity.y == 0 (resting-contact snap)
/// - was_grounded_last_frame = значение is_grounded на предыдущем probe
/// - wants_uncrouch ⇒ is_crouching (pending uncrouch бывает только в приседе)
#[derive(Debug, Clone, PartialEq)]
pub struct MovementState {
    pub velocity: Vec2,
    /// Позиция тела до интеграции этого fixed tick
    pub previous_position: Vec2,
    /// Позиция после интеграции (куда тело перемещено)
    pub current_position: Vec2,
    /// Raw результат последнего ground probe
    pub is_grounded: bool,
    pub was_grounded_last_frame: bool,
    pub is_crouching: bool,
    /// Uncrouch запрошен, но потолок блокирует
    pub wants_uncrouch: bool,
    pub facing: Facing,
}

impl MovementState {
    pub fn new(position: Vec2) -> Self {
        Self {
            velocity: Vec2::ZERO,
            previous_position: position,
            current_position: position,
            is_grounded: false,
            was_grounded_last_frame: false,
            is_crouching: false,
            wants_uncrouch: false,
            facing: Facing::Right,
        }
    }

    /// Стабильный grounded: raw flag держится два probe подряд
    pub fn is_stably_grounded(&self) -> bool {
        self.is_grounded && self.is_grounded == self.was_grounded_last_frame
    }

    pub fn is_ascending(&self) -> bool {
        self.velocity.y > 0.0
    }
}
