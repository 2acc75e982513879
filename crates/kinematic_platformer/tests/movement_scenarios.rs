//! Сценарные тесты контроллера на AabbWorld
//!
//! Driver порядок как в игре: variable tick (input), затем fixed tick (physics).

use bevy::prelude::*;
use kinematic_platformer::collision_layers::{
    COLLISION_LAYER_ENVIRONMENT, COLLISION_LAYER_PLATFORMS, GROUND_FILTER_DEFAULT,
};
use kinematic_platformer::*;

const DT: f32 = 1.0 / 60.0;

/// Capsule 1×2 стоит на полу (верх пола y = 0), пол x ∈ [-50, 50]
fn spawn_on_floor(tunables: MovementTunables) -> (CharacterMovement, AabbWorld) {
    let start = Vec2::new(0.0, 1.0);
    let collider = ColliderInfo::capsule(Entity::PLACEHOLDER, Vec2::new(1.0, 2.0), Vec2::ZERO);
    let mut movement = CharacterMovement::new(tunables, collider, start).expect("valid tunables");

    let mut world = AabbWorld::new(start);
    world.add_box(
        Vec2::new(0.0, -0.5),
        Vec2::new(100.0, 1.0),
        COLLISION_LAYER_ENVIRONMENT,
    );

    // Два probe → стабильный grounded
    movement.on_fixed_tick(&mut world, DT);
    movement.on_fixed_tick(&mut world, DT);

    (movement, world)
}

fn step(movement: &mut CharacterMovement, world: &mut AabbWorld, input: FrameInput) -> FrameOutcome {
    let outcome = movement.on_frame_tick(input, DT);
    movement.on_fixed_tick(world, DT);
    outcome
}

fn hold_right() -> FrameInput {
    FrameInput {
        axis: Vec2::X,
        ..default()
    }
}

/// Максимальная высота ног за прыжок
fn jump_apex(hold_jump: bool) -> f32 {
    let (mut movement, mut world) = spawn_on_floor(MovementTunables::default());
    let feet_offset = 1.0;

    let launch = step(
        &mut movement,
        &mut world,
        FrameInput {
            jump_pressed: true,
            jump_held: true,
            ..default()
        },
    );
    assert!(launch.jumped);

    let mut apex: f32 = 0.0;
    for _ in 0..120 {
        step(
            &mut movement,
            &mut world,
            FrameInput {
                jump_held: hold_jump,
                ..default()
            },
        );
        apex = apex.max(world.body_position().y - feet_offset);
    }
    apex
}

#[test]
fn test_full_jump_reaches_designed_height() {
    let apex = jump_apex(true);

    // Explicit Euler на 60Hz недолетает до h = 4 примерно на полметра
    assert!(apex > 3.5, "apex = {}", apex);
    assert!(apex <= 4.0 + 1e-3, "apex = {}", apex);
}

#[test]
fn test_released_jump_is_lower() {
    let full = jump_apex(true);
    let short = jump_apex(false);

    assert!(short < full * 0.75, "short {} vs full {}", short, full);
    assert!(short > 0.0);
}

#[test]
fn test_cannot_double_jump() {
    let (mut movement, mut world) = spawn_on_floor(MovementTunables::default());

    let first = step(
        &mut movement,
        &mut world,
        FrameInput {
            jump_pressed: true,
            jump_held: true,
            ..default()
        },
    );
    let second = step(
        &mut movement,
        &mut world,
        FrameInput {
            jump_pressed: true,
            jump_held: true,
            ..default()
        },
    );

    assert!(first.jumped);
    assert!(!second.jumped);
}

#[test]
fn test_run_accelerates_to_max_speed() {
    let (mut movement, mut world) = spawn_on_floor(MovementTunables::default());

    for _ in 0..30 {
        step(&mut movement, &mut world, hold_right());
    }

    assert_eq!(movement.current_velocity().x, 7.0);
    assert!(movement.is_grounded());
    assert!(world.body_position().x > 0.0);
}

#[test]
fn test_turning_around_emits_single_flip() {
    let (mut movement, mut world) = spawn_on_floor(MovementTunables::default());
    let left = FrameInput {
        axis: Vec2::NEG_X,
        ..default()
    };

    let flips: Vec<_> = (0..10)
        .filter_map(|_| step(&mut movement, &mut world, left).flipped)
        .collect();

    assert_eq!(flips, vec![Facing::Left]);
}

#[test]
fn test_walking_off_ledge_keeps_last_vertical_velocity() {
    let start = Vec2::new(0.0, 1.0);
    let collider = ColliderInfo::capsule(Entity::PLACEHOLDER, Vec2::new(1.0, 2.0), Vec2::ZERO);
    let mut movement = CharacterMovement::new(MovementTunables::default(), collider, start)
        .expect("valid tunables");
    let mut world = AabbWorld::new(start);
    // Платформа заканчивается на x = 2
    world.add_box(
        Vec2::new(-3.0, -0.5),
        Vec2::new(10.0, 1.0),
        COLLISION_LAYER_ENVIRONMENT,
    );

    for _ in 0..60 {
        step(&mut movement, &mut world, hold_right());
    }

    // Gravity моделируется только на подъёме: после snap'а velocity.y остаётся 0
    assert!(world.body_position().x > 2.5 + 0.5);
    assert!(!movement.is_grounded());
    assert_eq!(movement.current_velocity().y, 0.0);
}

#[test]
fn test_crouch_walk_under_ceiling_stands_up_after_exit() {
    let (mut movement, mut world) = spawn_on_floor(MovementTunables::default());
    // Потолок x ∈ [3, 7], низ на y = 1.1
    world.add_box(
        Vec2::new(5.0, 2.0),
        Vec2::new(4.0, 1.8),
        COLLISION_LAYER_ENVIRONMENT,
    );

    assert!(movement.crouch());

    while world.body_position().x < 4.0 {
        step(&mut movement, &mut world, hold_right());
    }

    assert!(!movement.un_crouch(&world));
    assert!(movement.wants_uncrouch());

    let mut stood_up_at = None;
    for _ in 0..400 {
        step(&mut movement, &mut world, hold_right());
        if !movement.is_crouching() {
            stood_up_at = Some(world.body_position().x);
            break;
        }
    }

    let x = stood_up_at.expect("uncrouch commits once the ceiling is behind");
    // Левый луч (x − 0.5) должен выйти из-под потолка
    assert!(x > 7.5, "stood up at x = {}", x);
    assert!(x < 7.5 + 7.0 * DT, "stood up late at x = {}", x);
    assert!((movement.collider().size().y - 2.0).abs() < 1e-5);
}

#[test]
fn test_crouch_speed_is_reduced() {
    let (mut movement, mut world) = spawn_on_floor(MovementTunables::default());
    movement.crouch();

    for _ in 0..30 {
        step(&mut movement, &mut world, hold_right());
    }

    assert!((movement.current_velocity().x - 2.1).abs() < 1e-5);
}

#[test]
fn test_box_collider_probes_like_capsule() {
    let start = Vec2::new(0.0, 1.0);
    let collider = ColliderInfo::cuboid(Entity::PLACEHOLDER, Vec2::new(1.0, 2.0), Vec2::ZERO);
    let mut movement = CharacterMovement::new(MovementTunables::default(), collider, start)
        .expect("valid tunables");
    let mut world = AabbWorld::new(start);
    world.add_box(
        Vec2::new(0.0, -0.5),
        Vec2::new(10.0, 1.0),
        COLLISION_LAYER_ENVIRONMENT,
    );

    movement.on_fixed_tick(&mut world, DT);
    movement.on_fixed_tick(&mut world, DT);

    assert!(movement.is_grounded());
    assert_eq!(movement.collider().kind(), ShapeKind::Box);
}

#[test]
fn test_empty_world_is_never_grounded() {
    let collider = ColliderInfo::capsule(Entity::PLACEHOLDER, Vec2::new(1.0, 2.0), Vec2::ZERO);
    let mut movement = CharacterMovement::new(MovementTunables::default(), collider, Vec2::ZERO)
        .expect("valid tunables");
    let mut world = AabbWorld::new(Vec2::ZERO);

    for _ in 0..10 {
        step(&mut movement, &mut world, hold_right());
    }

    assert!(!movement.is_grounded());
    assert_eq!(
        movement.raycast_against_ground(&world, Vec2::ZERO, Vec2::NEG_Y, 100.0),
        0
    );
}

#[test]
fn test_platform_layer_is_ground_only_when_filtered_in() {
    let start = Vec2::new(0.0, 1.0);
    let grounded_with = |ground_layers: u32| {
        let tunables = MovementTunables {
            ground_layers,
            ..default()
        };
        let collider = ColliderInfo::capsule(Entity::PLACEHOLDER, Vec2::new(1.0, 2.0), Vec2::ZERO);
        let mut movement =
            CharacterMovement::new(tunables, collider, start).expect("valid tunables");
        let mut world = AabbWorld::new(start);
        world.add_box(
            Vec2::new(0.0, -0.5),
            Vec2::new(10.0, 1.0),
            COLLISION_LAYER_PLATFORMS,
        );

        movement.on_fixed_tick(&mut world, DT);
        movement.on_fixed_tick(&mut world, DT);
        movement.is_grounded()
    };

    assert!(!grounded_with(GROUND_FILTER_DEFAULT));
    assert!(grounded_with(GROUND_FILTER_DEFAULT | COLLISION_LAYER_PLATFORMS));
}
