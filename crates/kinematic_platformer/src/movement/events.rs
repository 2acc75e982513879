//! Movement events

use bevy::prelude::*;

use super::state::Facing;

/// Event: персонаж развернулся (orientation sink для sprite/animation)
///
/// Генерируется:
/// - apply_frame_input, когда знак input.x не совпал с facing
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacingChanged {
    pub entity: Entity,
    pub facing: Facing,
}
