//! Headless прогон контроллера
//!
//! Уровень (пол + низкий потолок) в Rapier, один персонаж, scripted input из seeded RNG.

use bevy::prelude::*;
use bevy::transform::TransformPlugin;
use bevy_rapier2d::prelude::*;
use rand::Rng;

use kinematic_platformer::collision_layers::COLLISION_LAYER_ENVIRONMENT;
use kinematic_platformer::{
    create_headless_app, logger, spawn_platformer_character, CharacterMovement, DeterministicRng,
    FacingChanged, MovementInput, MovementTunables,
};

/// Каждые N кадров scripted input меняет направление
const INPUT_CHANGE_INTERVAL: u32 = 30;

#[derive(Resource, Default)]
struct FrameCounter(u32);

fn spawn_level(mut commands: Commands) {
    let environment = CollisionGroups::new(
        Group::from_bits_truncate(COLLISION_LAYER_ENVIRONMENT),
        Group::ALL,
    );

    // Пол: верхняя грань на y = 0
    commands.spawn((
        Transform::from_xyz(0.0, -0.5, 0.0),
        Collider::cuboid(50.0, 0.5),
        environment,
    ));

    // Низкий потолок над x ∈ [6, 10]: стоя не пройти, только в приседе
    commands.spawn((
        Transform::from_xyz(8.0, 2.0, 0.0),
        Collider::cuboid(2.0, 0.8),
        environment,
    ));

    let spawned = spawn_platformer_character(
        &mut commands,
        Vec2::new(0.0, 1.0),
        Collider::capsule_y(0.5, 0.5),
        Vec2::ZERO,
        MovementTunables::default(),
    );

    if let Err(err) = spawned {
        logger::log_error(&format!("Level setup failed: {}", err));
    }
}

fn drive_scripted_input(
    mut counter: ResMut<FrameCounter>,
    mut rng: ResMut<DeterministicRng>,
    mut inputs: Query<&mut MovementInput>,
) {
    counter.0 += 1;
    if counter.0 % INPUT_CHANGE_INTERVAL != 0 {
        return;
    }

    for mut input in inputs.iter_mut() {
        input.axis.x = rng.rng.gen_range(-1..=1) as f32;
        input.jump_pressed = rng.rng.gen_bool(0.25);
        input.jump_held = input.jump_pressed && rng.rng.gen_bool(0.5);

        if rng.rng.gen_bool(0.2) {
            input.crouch_pressed = true;
        } else if rng.rng.gen_bool(0.3) {
            input.crouch_released = true;
        }
    }
}

fn log_facing_changes(mut events: EventReader<FacingChanged>) {
    for event in events.read() {
        logger::log(&format!("{:?} now facing {:?}", event.entity, event.facing));
    }
}

fn main() {
    let seed = 42;
    println!("Starting headless platformer simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins((
        TransformPlugin,
        RapierPhysicsPlugin::<NoUserData>::default().in_fixed_schedule(),
    ))
    .init_resource::<FrameCounter>()
    .add_systems(Startup, spawn_level)
    .add_systems(PreUpdate, drive_scripted_input)
    .add_systems(PostUpdate, log_facing_changes);

    // Запускаем 1000 тиков симуляции
    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            let mut query = app
                .world_mut()
                .query::<(&CharacterMovement, &Transform)>();
            for (movement, transform) in query.iter(app.world()) {
                println!(
                    "Tick {}: pos {:?}, velocity {:?}, grounded {}, crouching {}",
                    tick,
                    transform.translation.truncate(),
                    movement.current_velocity(),
                    movement.is_grounded(),
                    movement.is_crouching()
                );
            }
        }
    }

    println!("Simulation complete!");
}
