//! Movement компоненты Bevy слоя

use bevy::prelude::*;

use super::controller::FrameInput;

/// Входные данные для движения
///
/// Для headless тестов/демо — mock input через этот компонент.
/// Для игры — заполняется input binding системой (вне этого crate).
/// Edge-флаги (`*_pressed`, `crouch_released`) сбрасываются после обработки.
/// `crouch_released` сбрасывается только когда uncrouch реально запрошен (нужен Rapier context).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MovementInput {
    /// Movement axis, компоненты в [-1, 1]
    pub axis: Vec2,
    pub jump_pressed: bool,
    pub jump_held: bool,
    pub crouch_pressed: bool,
    pub crouch_released: bool,
}

impl MovementInput {
    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            axis: self.axis,
            jump_pressed: self.jump_pressed,
            jump_held: self.jump_held,
        }
    }

    /// Сбрасывает press-edges; `crouch_released` сбрасывает система uncrouch
    pub fn consume_edges(&mut self) {
        self.jump_pressed = false;
        self.crouch_pressed = false;
    }
}
