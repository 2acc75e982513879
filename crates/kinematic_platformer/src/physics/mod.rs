//! Physics collaborators контроллера
//!
//! - world: trait'ы `RayCaster` / `PhysicsWorld` (граница с движком)
//! - probe: 3-ray ground/ceiling probes + speed-dependent quorum
//! - aabb: детерминированный axis-aligned мир (headless, tests)
//! - rapier: backend поверх bevy_rapier2d

pub mod aabb;
pub mod probe;
pub mod rapier;
pub mod world;

// Re-export основных типов
pub use aabb::{AabbCollider, AabbId, AabbWorld};
pub use probe::{grounded_quorum, GroundProber, ProbeFan, FAST_MOVE_SPEED, PROBE_RAY_COUNT};
pub use rapier::{ground_query_filter, RapierBody, RapierRayCaster};
pub use world::{PhysicsWorld, RayCaster, RayHit};
