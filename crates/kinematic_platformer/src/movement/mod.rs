//! Movement domain — kinematic контроллер платформера
//!
//! Содержит:
//! - CharacterMovement (core: integration, probes, crouch state machine)
//! - MovementState / Facing (per-character состояние)
//! - MovementInput (Bevy input компонент)
//! - FacingChanged (event)
//! - KinematicMovementPlugin + systems (fixed/variable tick через Rapier)

pub mod components;
pub mod controller;
pub mod events;
pub mod state;
pub mod systems;

// Re-export all components and events
pub use components::*;
pub use controller::{move_towards, CharacterMovement, FrameInput, FrameOutcome};
pub use events::*;
pub use state::{Facing, MovementState};
pub use systems::{
    apply_frame_input, fixed_movement_tick, spawn_platformer_character, sync_collider_shapes,
    KinematicMovementPlugin,
};
