//! Bevy системы kinematic контроллера
//!
//! Архитектура:
//! - Rapier для queries (RigidBody::KinematicPositionBased, collider на child entity)
//! - Custom velocity integration в CharacterMovement (не используем Rapier forces)
//! - Update (variable tick): horizontal input, jump edge/abort, crouch edges
//! - FixedUpdate (fixed tick): gravity → move → probes → uncrouch retry → collider sync
//!
//! Детерминизм: fixed timestep (60Hz), детерминированная физика Rapier

use bevy::prelude::*;
use bevy_rapier2d::plugin::PhysicsSet;
use bevy_rapier2d::prelude::*;

use crate::collision_layers::{COLLISION_LAYER_CHARACTERS, COLLISION_MASK_CHARACTERS};
use crate::config::MovementTunables;
use crate::error::SpawnError;
use crate::logger;
use crate::physics::{RapierBody, RapierRayCaster};
use crate::shape::ShapeAdapter;

use super::components::MovementInput;
use super::controller::CharacterMovement;
use super::events::FacingChanged;
use super::state::Facing;

/// Система variable tick (Update, frame-rate dependent dt)
///
/// Uncrouch требует ceiling probe → Rapier context; без него request ждёт в `MovementInput`.
pub fn apply_frame_input(
    time: Res<Time>,
    rapier: ReadRapierContext,
    mut movers: Query<(Entity, &mut CharacterMovement, &mut MovementInput)>,
    mut facing_events: EventWriter<FacingChanged>,
) {
    let delta = time.delta_secs();
    let context = rapier.single().ok();

    for (entity, mut movement, mut input) in movers.iter_mut() {
        let outcome = movement.on_frame_tick(input.frame_input(), delta);

        if let Some(facing) = outcome.flipped {
            facing_events.write(FacingChanged { entity, facing });
        }

        if input.crouch_pressed {
            movement.crouch();
        }

        // Без context'а crouch_released остаётся выставленным до следующего кадра
        if input.crouch_released {
            if let Some(context) = context.as_ref() {
                let rays = RapierRayCaster::new(context, movement.collider().shape_handle());
                movement.un_crouch(&rays);
                input.crouch_released = false;
            }
        }

        input.consume_edges();
    }
}

/// Система fixed tick (FixedUpdate)
///
/// Каждый персонаж: gravity → integrate + kinematic move → ground probe → uncrouch retry.
pub fn fixed_movement_tick(
    time: Res<Time<Fixed>>,
    rapier: ReadRapierContext,
    mut movers: Query<(&mut CharacterMovement, &mut Transform)>,
) {
    let delta = time.delta_secs();

    let Ok(context) = rapier.single() else {
        return;
    };

    for (mut movement, mut transform) in movers.iter_mut() {
        let collider = movement.collider().shape_handle();
        let mut body = RapierBody::new(&context, collider, &mut *transform);
        movement.on_fixed_tick(&mut body, delta);
    }
}

/// Синхронизирует Rapier collider (child entity) после crouch/uncrouch
///
/// Size → новый `Collider`, offset → локальный `Transform` child'а.
pub fn sync_collider_shapes(
    mut movers: Query<&mut CharacterMovement>,
    mut colliders: Query<(&mut Collider, &mut Transform), Without<CharacterMovement>>,
) {
    for mut movement in movers.iter_mut() {
        if !movement.bypass_change_detection().take_shape_change() {
            continue;
        }

        let info = movement.collider();
        let Ok((mut collider, mut transform)) = colliders.get_mut(info.shape_handle()) else {
            logger::log_warning(&format!(
                "sync_collider_shapes: collider entity {:?} не найден",
                info.shape_handle()
            ));
            continue;
        };

        *collider = info.to_collider();
        transform.translation = info.offset().extend(transform.translation.z);
    }
}

/// Plugin для kinematic контроллера
///
/// Fixed системы запускаются ДО rapier backend sync (если Rapier в FixedUpdate).
pub struct KinematicMovementPlugin;

impl Plugin for KinematicMovementPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MovementTunables>()
            .register_type::<MovementInput>()
            .register_type::<Facing>()
            .add_event::<FacingChanged>()
            .add_systems(Update, apply_frame_input)
            .add_systems(
                FixedUpdate,
                (fixed_movement_tick, sync_collider_shapes)
                    .chain() // Последовательное выполнение
                    .before(PhysicsSet::SyncBackend),
            );
    }
}

/// Spawn helper для персонажа платформера
///
/// Создает:
/// - body entity: Transform + CharacterMovement + MovementInput + RigidBody::KinematicPositionBased
/// - child collider entity: Collider + CollisionGroups, Transform = shape offset
///
/// Collider не capsule/cuboid или tunables вне диапазона → `SpawnError`, ничего не спавнится.
pub fn spawn_platformer_character(
    commands: &mut Commands,
    position: Vec2,
    collider: Collider,
    offset: Vec2,
    tunables: MovementTunables,
) -> Result<Entity, SpawnError> {
    let collider_entity = commands.spawn_empty().id();

    let movement = match CharacterMovement::from_collider(
        tunables,
        collider_entity,
        &collider,
        offset,
        position,
    ) {
        Ok(movement) => movement,
        Err(err) => {
            commands.entity(collider_entity).despawn();
            logger::log_error(&format!("spawn_platformer_character: {}", err));
            return Err(err);
        }
    };

    commands.entity(collider_entity).insert((
        collider,
        Transform::from_translation(offset.extend(0.0)),
        CollisionGroups::new(
            Group::from_bits_truncate(COLLISION_LAYER_CHARACTERS),
            Group::from_bits_truncate(COLLISION_MASK_CHARACTERS),
        ),
    ));

    let body = commands
        .spawn((
            Transform::from_translation(position.extend(0.0)),
            movement,
            MovementInput::default(),
            RigidBody::KinematicPositionBased,
        ))
        .add_child(collider_entity)
        .id();

    logger::log_info(&format!(
        "Spawned platformer character {:?} at {:?} (collider {:?})",
        body, position, collider_entity
    ));

    Ok(body)
}
