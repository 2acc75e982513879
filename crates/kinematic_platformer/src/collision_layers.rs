//! Collision Layers Constants
//!
//! Битовые маски слоёв — общие для контроллера, Rapier collision groups и AabbWorld.
//!
//! ## Слои:
//! - Bit 0 (0b1 = 1): Reserved
//! - Bit 1 (0b10 = 2): Characters (kinematic bodies)
//! - Bit 2 (0b100 = 4): Environment (ground, walls, ceilings)
//! - Bit 3 (0b1000 = 8): Platforms (отдельный слой, ground filter включает его опционально)
//!
//! ## Использование:
//! ```rust
//! use kinematic_platformer::collision_layers::*;
//!
//! let tunables = kinematic_platformer::MovementTunables {
//!     ground_layers: GROUND_FILTER_DEFAULT | COLLISION_LAYER_PLATFORMS,
//!     ..Default::default()
//! };
//! assert!(tunables.ground_layers & COLLISION_LAYER_ENVIRONMENT != 0);
//! ```

// ============================================================================
// Layer Битовые Маски (на каком слое объект находится)
// ============================================================================

/// Characters (kinematic bodies — player, NPC)
pub const COLLISION_LAYER_CHARACTERS: u32 = 0b10; // 2

/// Environment (static ground, walls, ceilings)
pub const COLLISION_LAYER_ENVIRONMENT: u32 = 0b100; // 4

/// Platforms: обычные solid боксы на своём слое
///
/// Probe видит их только если слой добавлен в `ground_layers` (ground и ceiling фильтр общий).
pub const COLLISION_LAYER_PLATFORMS: u32 = 0b1000; // 8

// ============================================================================
// Mask Битовые Маски (с чем объект коллидирует / что видит probe)
// ============================================================================

/// Ground filter по умолчанию: только environment
pub const GROUND_FILTER_DEFAULT: u32 = COLLISION_LAYER_ENVIRONMENT;

/// Mask для collider'а персонажа: environment + platforms (не другие персонажи)
pub const COLLISION_MASK_CHARACTERS: u32 = COLLISION_LAYER_ENVIRONMENT | COLLISION_LAYER_PLATFORMS;
