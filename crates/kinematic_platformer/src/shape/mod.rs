//! Shape adapter: size/offset collider'а персонажа
//!
//! Архитектура:
//! - `ShapeAdapter` — общий интерфейс (size, offset, handle для queries)
//! - `CapsuleShape` / `BoxShape` — две конкретные реализации
//! - `ColliderInfo` — tagged variant, factory `from_collider` выбирает реализацию
//!
//! Size в терминах bounding box: `size.x` — ширина, `size.y` — полная высота.
//! Offset — локальное смещение collider'а относительно тела.

use bevy::prelude::*;
use bevy_rapier2d::prelude::Collider;

use crate::error::UnsupportedShapeError;

/// Интерфейс к collision shape персонажа
pub trait ShapeAdapter {
    fn size(&self) -> Vec2;
    fn set_size(&mut self, size: Vec2);
    fn offset(&self) -> Vec2;
    fn set_offset(&mut self, offset: Vec2);
    /// Entity collider'а (для exclude в queries и sync с Rapier)
    fn shape_handle(&self) -> Entity;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Capsule,
    Box,
}

/// Вертикальная капсула
#[derive(Debug, Clone, PartialEq)]
pub struct CapsuleShape {
    pub handle: Entity,
    pub size: Vec2,
    pub offset: Vec2,
}

impl CapsuleShape {
    pub fn radius(&self) -> f32 {
        self.size.x * 0.5
    }

    /// Половина длины сегмента; 0 когда высота меньше ширины (капсула вырождается в круг)
    pub fn half_segment(&self) -> f32 {
        (self.size.y * 0.5 - self.radius()).max(0.0)
    }

    pub fn to_collider(&self) -> Collider {
        Collider::capsule_y(self.half_segment(), self.radius())
    }
}

impl ShapeAdapter for CapsuleShape {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    fn offset(&self) -> Vec2 {
        self.offset
    }

    fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    fn shape_handle(&self) -> Entity {
        self.handle
    }
}

/// Axis-aligned box
#[derive(Debug, Clone, PartialEq)]
pub struct BoxShape {
    pub handle: Entity,
    pub size: Vec2,
    pub offset: Vec2,
}

impl BoxShape {
    pub fn to_collider(&self) -> Collider {
        Collider::cuboid(self.size.x * 0.5, self.size.y * 0.5)
    }
}

impl ShapeAdapter for BoxShape {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    fn offset(&self) -> Vec2 {
        self.offset
    }

    fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    fn shape_handle(&self) -> Entity {
        self.handle
    }
}

/// Collider персонажа: capsule или box
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderInfo {
    Capsule(CapsuleShape),
    Box(BoxShape),
}

impl ColliderInfo {
    pub fn capsule(handle: Entity, size: Vec2, offset: Vec2) -> Self {
        Self::Capsule(CapsuleShape { handle, size, offset })
    }

    pub fn cuboid(handle: Entity, size: Vec2, offset: Vec2) -> Self {
        Self::Box(BoxShape { handle, size, offset })
    }

    /// Factory: Rapier collider → adapter
    ///
    /// Поддерживаются вертикальная капсула (`Collider::capsule_y`) и cuboid.
    /// Всё остальное — `UnsupportedShapeError` (setup defect, без fallback).
    pub fn from_collider(
        handle: Entity,
        collider: &Collider,
        offset: Vec2,
    ) -> Result<Self, UnsupportedShapeError> {
        if let Some(capsule) = collider.as_capsule() {
            let raw = capsule.raw;
            let axis = raw.segment.b - raw.segment.a;
            if axis.x.abs() > axis.y.abs() {
                return Err(UnsupportedShapeError::new("Capsule (horizontal)"));
            }

            let radius = raw.radius;
            let size = Vec2::new(radius * 2.0, (raw.half_height() + radius) * 2.0);
            return Ok(Self::capsule(handle, size, offset));
        }

        if let Some(cuboid) = collider.as_cuboid() {
            let half = cuboid.raw.half_extents;
            return Ok(Self::cuboid(handle, Vec2::new(half.x * 2.0, half.y * 2.0), offset));
        }

        Err(UnsupportedShapeError::new(format!(
            "{:?}",
            collider.raw.shape_type()
        )))
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Capsule(_) => ShapeKind::Capsule,
            Self::Box(_) => ShapeKind::Box,
        }
    }

    /// Rapier collider с текущим size (offset применяется через Transform child'а)
    pub fn to_collider(&self) -> Collider {
        match self {
            Self::Capsule(capsule) => capsule.to_collider(),
            Self::Box(cuboid) => cuboid.to_collider(),
        }
    }

    fn adapter(&self) -> &dyn ShapeAdapter {
        match self {
            Self::Capsule(capsule) => capsule,
            Self::Box(cuboid) => cuboid,
        }
    }

    fn adapter_mut(&mut self) -> &mut dyn ShapeAdapter {
        match self {
            Self::Capsule(capsule) => capsule,
            Self::Box(cuboid) => cuboid,
        }
    }
}

impl ShapeAdapter for ColliderInfo {
    fn size(&self) -> Vec2 {
        self.adapter().size()
    }

    fn set_size(&mut self, size: Vec2) {
        self.adapter_mut().set_size(size);
    }

    fn offset(&self) -> Vec2 {
        self.adapter().offset()
    }

    fn set_offset(&mut self, offset: Vec2) {
        self.adapter_mut().set_offset(offset);
    }

    fn shape_handle(&self) -> Entity {
        self.adapter().shape_handle()
    }
}

/// Меняет высоту, сохраняя нижний край на месте
///
/// Offset сдвигается на половину дельты высоты: ноги стоят, сжимается верх.
pub fn set_bottom_anchored_height(shape: &mut impl ShapeAdapter, new_height: f32) {
    let size = shape.size();
    let delta = new_height - size.y;

    shape.set_size(Vec2::new(size.x, new_height));
    shape.set_offset(shape.offset() + Vec2::new(0.0, delta * 0.5));
}
