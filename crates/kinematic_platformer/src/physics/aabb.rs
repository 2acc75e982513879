//! AabbWorld — детерминированный axis-aligned мир без Rapier
//!
//! Для headless прогонов и тестов: slab raycast по боксам + layer filter.
//! Collision response нет — тело перемещается ровно туда, куда сказали.

use bevy::prelude::*;

use super::world::{PhysicsWorld, RayCaster, RayHit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AabbId(usize);

/// Статичный бокс уровня
#[derive(Debug, Clone, PartialEq)]
pub struct AabbCollider {
    pub min: Vec2,
    pub max: Vec2,
    pub layers: u32,
    pub enabled: bool,
}

impl AabbCollider {
    pub fn from_center(center: Vec2, size: Vec2, layers: u32) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
            layers,
            enabled: true,
        }
    }

    /// Slab test. Origin внутри бокса → попадание на distance 0 (solid)
    pub fn ray_distance(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;

        for axis in 0..2 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let t1 = (lo - o) * inv;
            let t2 = (hi - o) * inv;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));

            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

/// Один body + набор статичных боксов
#[derive(Debug, Clone, Default)]
pub struct AabbWorld {
    position: Vec2,
    colliders: Vec<AabbCollider>,
}

impl AabbWorld {
    pub fn new(body_position: Vec2) -> Self {
        Self {
            position: body_position,
            colliders: Vec::new(),
        }
    }

    pub fn add_box(&mut self, center: Vec2, size: Vec2, layers: u32) -> AabbId {
        self.colliders
            .push(AabbCollider::from_center(center, size, layers));
        AabbId(self.colliders.len() - 1)
    }

    /// Включает/выключает бокс (например, убрать потолок над персонажем)
    pub fn set_enabled(&mut self, id: AabbId, enabled: bool) {
        if let Some(collider) = self.colliders.get_mut(id.0) {
            collider.enabled = enabled;
        }
    }
}

impl RayCaster for AabbWorld {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, layers: u32) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO || max_distance < 0.0 {
            return None;
        }

        self.colliders
            .iter()
            .filter(|collider| collider.enabled && collider.layers & layers != 0)
            .filter_map(|collider| collider.ray_distance(origin, direction, max_distance))
            .min_by(|a, b| a.total_cmp(b))
            .map(|distance| RayHit {
                point: origin + direction * distance,
                distance,
            })
    }
}

impl PhysicsWorld for AabbWorld {
    fn body_position(&self) -> Vec2 {
        self.position
    }

    fn move_position(&mut self, target: Vec2) {
        self.position = target;
    }
}
