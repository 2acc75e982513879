//! Physics World collaborator: ray queries + kinematic relocation
//!
//! Контроллер не знает о конкретном движке — всё через эти trait'ы.
//! Реализации: `RapierRayCaster`/`RapierBody` (bevy_rapier2d) и `AabbWorld` (headless/tests).

use bevy::prelude::*;

/// Результат одного raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec2,
    /// Расстояние от origin до точки попадания (вдоль нормализованного direction)
    pub distance: f32,
}

/// Read-only ray queries (ceiling probe, external line-of-sight)
///
/// Тотальные: нет попаданий = `None`, не ошибка.
pub trait RayCaster {
    /// Первое попадание луча по слоям `layers` в пределах `max_distance`
    fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32, layers: u32) -> Option<RayHit>;
}

/// Physics world с точки зрения одного kinematic тела
pub trait PhysicsWorld: RayCaster {
    /// Текущая позиция тела
    fn body_position(&self) -> Vec2;

    /// Безусловное kinematic перемещение (position set, не force)
    fn move_position(&mut self, target: Vec2);
}
