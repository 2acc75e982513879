//! Kinematic Platformer Movement
//!
//! Kinematic 2D контроллер персонажа платформера на Bevy 0.16 + Rapier 2D.
//!
//! Слои:
//! - core (movement::CharacterMovement): integration, 3-ray probes, crouch state machine.
//!   Не зависит от App — physics world передаётся в каждый tick (`PhysicsWorld`).
//! - Bevy (KinematicMovementPlugin): Update = variable tick, FixedUpdate = fixed tick,
//!   Rapier backend для raycasts и kinematic move.
//! - AabbWorld: детерминированный axis-aligned мир для headless прогонов и тестов.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod collision_layers;
pub mod config;
pub mod error;
pub mod logger;
pub mod movement;
pub mod physics;
pub mod shape;

// Re-export основных типов для удобства
pub use config::MovementTunables;
pub use error::{ConfigError, SpawnError, UnsupportedShapeError};
pub use movement::{
    spawn_platformer_character, CharacterMovement, Facing, FacingChanged, FrameInput,
    FrameOutcome, KinematicMovementPlugin, MovementInput, MovementState,
};
pub use physics::{AabbWorld, PhysicsWorld, RayCaster, RayHit};
pub use shape::{ColliderInfo, ShapeAdapter, ShapeKind};

/// Fixed timestep симуляции (Hz)
pub const FIXED_TICK_HZ: f64 = 60.0;

/// Главный plugin симуляции
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для physics tick
            .insert_resource(Time::<Fixed>::from_hz(FIXED_TICK_HZ))
            .add_plugins(KinematicMovementPlugin);

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded) — для scripted input
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную: один `app.update()` = один fixed tick.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / FIXED_TICK_HZ,
        )))
        .add_plugins(SimulationPlugin);

    app
}
