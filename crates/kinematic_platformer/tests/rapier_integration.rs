//! Rapier integration test
//!
//! Полный headless App: SimulationPlugin + Rapier в fixed schedule, пол и персонаж-капсула.
//!
//! Проверяем:
//! - Персонаж стабильно стоит на полу (Rapier raycasts + ground filter)
//! - Crouch пересобирает child Collider и его Transform (ноги на месте)
//! - Deferred uncrouch под потолком и автоматический подъём после его удаления
//! - Spawn с неподдерживаемым collider'ом / невалидными tunables ничего не оставляет в мире

use bevy::prelude::*;
use bevy::transform::TransformPlugin;
use bevy_rapier2d::prelude::*;
use kinematic_platformer::collision_layers::COLLISION_LAYER_ENVIRONMENT;
use kinematic_platformer::*;

/// Helper: headless App с Rapier в FixedUpdate
fn create_rapier_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);

    app.add_plugins((
        TransformPlugin,
        RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule(),
    ));

    app
}

/// Helper: статичный бокс на environment слое
fn spawn_environment_box(app: &mut App, center: Vec2, half_extents: Vec2) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(center.extend(0.0)),
            Collider::cuboid(half_extents.x, half_extents.y),
            CollisionGroups::new(
                Group::from_bits_truncate(COLLISION_LAYER_ENVIRONMENT),
                Group::ALL,
            ),
        ))
        .id()
}

/// Helper: пол с верхней гранью на y = 0
fn spawn_floor(app: &mut App) -> Entity {
    spawn_environment_box(app, Vec2::new(0.0, -0.5), Vec2::new(50.0, 0.5))
}

/// Helper: spawn через публичный helper + flush команд
fn spawn_character(
    app: &mut App,
    collider: Collider,
    tunables: MovementTunables,
) -> Result<Entity, SpawnError> {
    let result = {
        let mut commands = app.world_mut().commands();
        spawn_platformer_character(
            &mut commands,
            Vec2::new(0.0, 1.0),
            collider,
            Vec2::ZERO,
            tunables,
        )
    };
    app.world_mut().flush();
    result
}

fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

fn movement(app: &App, body: Entity) -> &CharacterMovement {
    app.world()
        .get::<CharacterMovement>(body)
        .expect("body has CharacterMovement")
}

fn input_mut(app: &mut App, body: Entity) -> Mut<'_, MovementInput> {
    app.world_mut()
        .get_mut::<MovementInput>(body)
        .expect("body has MovementInput")
}

fn entity_count(app: &mut App) -> usize {
    let mut query = app.world_mut().query::<Entity>();
    query.iter(app.world()).count()
}

/// Child collider → (size, local offset) как их видит Rapier
fn child_collider_shape(app: &App, body: Entity) -> (Vec2, Vec2) {
    let handle = movement(app, body).collider().shape_handle();
    let collider = app
        .world()
        .get::<Collider>(handle)
        .expect("child has Collider");
    let transform = app
        .world()
        .get::<Transform>(handle)
        .expect("child has Transform");

    let info = ColliderInfo::from_collider(handle, collider, Vec2::ZERO)
        .expect("rebuilt collider stays capsule");
    (info.size(), transform.translation.truncate())
}

fn assert_vec2_near(actual: Vec2, expected: Vec2) {
    assert!(
        (actual - expected).length() < 1e-4,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

/// Test: персонаж на полу становится grounded и не дрейфует
#[test]
fn test_character_rests_on_rapier_floor() {
    let mut app = create_rapier_app(42);
    spawn_floor(&mut app);
    let body = spawn_character(
        &mut app,
        Collider::capsule_y(0.5, 0.5),
        MovementTunables::default(),
    )
    .expect("capsule character spawns");

    run_ticks(&mut app, 30);

    assert!(movement(&app, body).is_grounded());
    assert_eq!(movement(&app, body).current_velocity(), Vec2::ZERO);

    let y = app
        .world()
        .get::<Transform>(body)
        .expect("body has Transform")
        .translation
        .y;
    assert!((y - 1.0).abs() < 1e-4, "body drifted to y = {}", y);

    run_ticks(&mut app, 30);
    assert!(movement(&app, body).is_grounded());
}

/// Test: crouch пересобирает child Collider, нижний край остаётся на полу
#[test]
fn test_crouch_rebuilds_child_collider_bottom_anchored() {
    let mut app = create_rapier_app(42);
    spawn_floor(&mut app);
    let body = spawn_character(
        &mut app,
        Collider::capsule_y(0.5, 0.5),
        MovementTunables::default(),
    )
    .expect("capsule character spawns");
    run_ticks(&mut app, 30);

    let (standing_size, standing_offset) = child_collider_shape(&app, body);
    assert_vec2_near(standing_size, Vec2::new(1.0, 2.0));
    assert_vec2_near(standing_offset, Vec2::ZERO);

    input_mut(&mut app, body).crouch_pressed = true;
    run_ticks(&mut app, 3);

    assert!(movement(&app, body).is_crouching());
    let (size, offset) = child_collider_shape(&app, body);
    assert_vec2_near(size, movement(&app, body).collider().size());
    assert_vec2_near(size, Vec2::new(1.0, 1.0));
    assert_vec2_near(offset, movement(&app, body).collider().offset());
    // Ноги: offset.y − size.y/2 как у стоящего (−1 относительно тела)
    assert!((offset.y - size.y * 0.5 + 1.0).abs() < 1e-4);

    assert!(movement(&app, body).is_grounded());
}

/// Test: uncrouch под потолком откладывается и срабатывает после удаления потолка
#[test]
fn test_uncrouch_deferred_under_rapier_ceiling() {
    let mut app = create_rapier_app(42);
    spawn_floor(&mut app);
    // Низ потолка на y = 1.1: присевший (верх на y = 1) пролезает
    let ceiling = spawn_environment_box(&mut app, Vec2::new(0.0, 1.4), Vec2::new(2.0, 0.3));
    let body = spawn_character(
        &mut app,
        Collider::capsule_y(0.5, 0.5),
        MovementTunables::default(),
    )
    .expect("capsule character spawns");
    run_ticks(&mut app, 30);

    input_mut(&mut app, body).crouch_pressed = true;
    run_ticks(&mut app, 3);
    assert!(movement(&app, body).is_crouching());

    input_mut(&mut app, body).crouch_released = true;
    run_ticks(&mut app, 3);

    assert!(movement(&app, body).is_crouching());
    assert!(movement(&app, body).wants_uncrouch());
    assert!(!input_mut(&mut app, body).crouch_released);

    app.world_mut().despawn(ceiling);
    run_ticks(&mut app, 5);

    assert!(!movement(&app, body).is_crouching());
    assert!(!movement(&app, body).wants_uncrouch());
    let (size, offset) = child_collider_shape(&app, body);
    assert_vec2_near(size, Vec2::new(1.0, 2.0));
    assert_vec2_near(offset, Vec2::ZERO);
}

/// Test: ball collider → SpawnError::Shape, лишних entity не остаётся
#[test]
fn test_spawn_rejects_ball_collider() {
    let mut app = create_rapier_app(42);
    spawn_floor(&mut app);
    let before = entity_count(&mut app);

    let result = spawn_character(&mut app, Collider::ball(0.5), MovementTunables::default());

    match result {
        Err(SpawnError::Shape(err)) => assert_eq!(err.kind, "Ball"),
        other => panic!("expected SpawnError::Shape, got {:?}", other),
    }
    assert_eq!(entity_count(&mut app), before);

    run_ticks(&mut app, 2);
    let mut movers = app.world_mut().query::<&CharacterMovement>();
    assert_eq!(movers.iter(app.world()).count(), 0);
}

/// Test: нулевая crouch height → SpawnError::Config, лишних entity не остаётся
#[test]
fn test_spawn_rejects_zero_crouch_height() {
    let mut app = create_rapier_app(42);
    let before = entity_count(&mut app);

    let tunables = MovementTunables {
        crouch_height_percent: 0.0,
        ..default()
    };
    let result = spawn_character(&mut app, Collider::capsule_y(0.5, 0.5), tunables);

    assert!(matches!(result, Err(SpawnError::Config(_))));
    assert_eq!(entity_count(&mut app), before);
}

/// Test: без Rapier context uncrouch request не теряется
#[test]
fn test_uncrouch_request_waits_for_physics_context() {
    // Без RapierPhysicsPlugin: context'а нет, проверить потолок нечем
    let mut app = create_headless_app(7);
    let body = spawn_character(
        &mut app,
        Collider::capsule_y(0.5, 0.5),
        MovementTunables::default(),
    )
    .expect("capsule character spawns");

    input_mut(&mut app, body).crouch_pressed = true;
    run_ticks(&mut app, 2);
    assert!(movement(&app, body).is_crouching());

    input_mut(&mut app, body).crouch_released = true;
    run_ticks(&mut app, 3);

    assert!(movement(&app, body).is_crouching());
    assert!(input_mut(&mut app, body).crouch_released);
    assert!(!input_mut(&mut app, body).crouch_pressed);
}
