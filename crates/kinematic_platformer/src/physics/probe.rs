//! Ground/Ceiling prober: веер из 3 параллельных лучей
//!
//! Геометрия (одинаковая для земли и потолка):
//! - origins: anchor − half_width, anchor, anchor + half_width (по X)
//! - длина: half_width + 2 × grounded_raycast_distance
//! - фильтр: ground layers из tunables
//!
//! Quorum для земли зависит от скорости (anti-tunneling):
//! - |velocity| > 10 → нужны все 3 попадания (glancing contact на скорости не считается)
//! - иначе → хватит одного (corner-clipping на малой скорости не теряет землю)

use bevy::prelude::*;

use super::world::RayCaster;

pub const PROBE_RAY_COUNT: usize = 3;

/// Порог "быстрого" движения для quorum (units/s)
pub const FAST_MOVE_SPEED: f32 = 10.0;

/// Веер probe-лучей
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeFan {
    pub origins: [Vec2; PROBE_RAY_COUNT],
    pub direction: Vec2,
    pub length: f32,
}

impl ProbeFan {
    pub fn new(anchor: Vec2, width: f32, direction: Vec2, raycast_distance: f32) -> Self {
        let half_width = width * 0.5;

        Self {
            origins: [
                anchor + Vec2::NEG_X * half_width,
                anchor,
                anchor + Vec2::X * half_width,
            ],
            direction,
            length: half_width + raycast_distance * 2.0,
        }
    }

    /// Сколько лучей что-то задели (0..=3)
    pub fn count_hits(&self, world: &impl RayCaster, layers: u32) -> usize {
        self.origins
            .iter()
            .filter(|origin| {
                world
                    .raycast(**origin, self.direction, self.length, layers)
                    .is_some()
            })
            .count()
    }
}

/// Speed-dependent quorum
pub fn grounded_quorum(hit_count: usize, speed: f32) -> bool {
    if speed > FAST_MOVE_SPEED {
        hit_count == PROBE_RAY_COUNT
    } else {
        hit_count > 0
    }
}

/// Probe под/над shape персонажа
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundProber {
    pub layers: u32,
    pub raycast_distance: f32,
}

impl GroundProber {
    pub fn new(layers: u32, raycast_distance: f32) -> Self {
        Self {
            layers,
            raycast_distance,
        }
    }

    pub fn ground_fan(&self, bottom: Vec2, width: f32) -> ProbeFan {
        ProbeFan::new(bottom, width, Vec2::NEG_Y, self.raycast_distance)
    }

    pub fn ceiling_fan(&self, top: Vec2, width: f32) -> ProbeFan {
        ProbeFan::new(top, width, Vec2::Y, self.raycast_distance)
    }

    /// Число попаданий вниз от bottom-center
    pub fn ground_hits(&self, world: &impl RayCaster, bottom: Vec2, width: f32) -> usize {
        self.ground_fan(bottom, width).count_hits(world, self.layers)
    }

    /// Потолок блокирует, если задет хотя бы один луч
    pub fn ceiling_blocked(&self, world: &impl RayCaster, top: Vec2, width: f32) -> bool {
        self.ceiling_fan(top, width).count_hits(world, self.layers) > 0
    }
}
