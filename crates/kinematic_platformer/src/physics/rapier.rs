//! Rapier backend для `RayCaster`/`PhysicsWorld`
//!
//! - Raycast через `RapierContext::cast_ray` (solid, без sensors)
//! - Фильтр: `CollisionGroups` из битовой маски ground layers
//! - Собственный collider персонажа исключается из queries
//! - Kinematic move = запись `Transform` тела (RigidBody::KinematicPositionBased)

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::world::{PhysicsWorld, RayCaster, RayHit};

/// QueryFilter для probe-лучей: только `layers`, без sensors и без своего collider'а
pub fn ground_query_filter(layers: u32, exclude_collider: Entity) -> QueryFilter<'static> {
    QueryFilter::new()
        .exclude_sensors()
        .exclude_collider(exclude_collider)
        .groups(CollisionGroups::new(
            Group::ALL,
            Group::from_bits_truncate(layers),
        ))
}

/// Ray queries от имени одного персонажа
pub struct RapierRayCaster<'a, 'c> {
    context: &'a RapierContext<'c>,
    exclude_collider: Entity,
}

impl<'a, 'c> RapierRayCaster<'a, 'c> {
    pub fn new(context: &'a RapierContext<'c>, exclude_collider: Entity) -> Self {
        Self {
            context,
            exclude_collider,
        }
    }
}

impl RayCaster for RapierRayCaster<'_, '_> {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, layers: u32) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO {
            return None;
        }

        let filter = ground_query_filter(layers, self.exclude_collider);

        self.context
            .cast_ray(origin, direction, max_distance, true, filter)
            .map(|(_entity, distance)| RayHit {
                point: origin + direction * distance,
                distance,
            })
    }
}

/// Kinematic тело персонажа в Rapier мире
pub struct RapierBody<'a, 'c> {
    rays: RapierRayCaster<'a, 'c>,
    transform: &'a mut Transform,
}

impl<'a, 'c> RapierBody<'a, 'c> {
    pub fn new(context: &'a RapierContext<'c>, collider: Entity, transform: &'a mut Transform) -> Self {
        Self {
            rays: RapierRayCaster::new(context, collider),
            transform,
        }
    }
}

impl RayCaster for RapierBody<'_, '_> {
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, layers: u32) -> Option<RayHit> {
        self.rays.raycast(origin, direction, max_distance, layers)
    }
}

impl PhysicsWorld for RapierBody<'_, '_> {
    fn body_position(&self) -> Vec2 {
        self.transform.translation.truncate()
    }

    fn move_position(&mut self, target: Vec2) {
        // Z не трогаем (render order)
        self.transform.translation = target.extend(self.transform.translation.z);
    }
}
