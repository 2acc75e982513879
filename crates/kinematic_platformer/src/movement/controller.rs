//! CharacterMovement — kinematic controller платформера
//!
//! Архитектура:
//! - Custom velocity integration (без forces): gravity только на подъёме
//! - Kinematic move через `PhysicsWorld::move_position`
//! - 3-ray ground probe с quorum, ceiling probe для uncrouch
//! - Crouch state machine с deferred uncrouch (retry каждый fixed tick)
//!
//! Два entry point'а, таймеров внутри нет:
//! - `on_fixed_tick(world, dt)`: gravity → integrate + move → ground probe → uncrouch retry
//! - `on_frame_tick(input, dt)`: horizontal response, jump edge, jump abort

use bevy::prelude::*;
use bevy_rapier2d::prelude::Collider;

use crate::config::MovementTunables;
use crate::error::{ConfigError, SpawnError};
use crate::logger;
use crate::physics::{grounded_quorum, GroundProber, PhysicsWorld, RayCaster, RayHit};
use crate::shape::{set_bottom_anchored_height, ColliderInfo, ShapeAdapter};

use super::state::{Facing, MovementState};

/// Input одного variable tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Movement axis, компоненты в [-1, 1]
    pub axis: Vec2,
    /// Jump нажат в этом кадре (edge)
    pub jump_pressed: bool,
    /// Jump удерживается; отпущен во время подъёма → jump abort
    pub jump_held: bool,
}

/// Что произошло за variable tick (для событий Bevy слоя)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    pub flipped: Option<Facing>,
    pub jumped: bool,
}

/// Kinematic контроллер персонажа
///
/// Владеет MovementState и shape adapter'ом эксклюзивно.
#[derive(Component, Debug, Clone)]
pub struct CharacterMovement {
    tunables: MovementTunables,
    state: MovementState,
    collider: ColliderInfo,
    prober: GroundProber,
    /// Shape изменился с последнего sync в Rapier
    shape_dirty: bool,
}

impl CharacterMovement {
    /// Tunables валидируются здесь: crouch с нулевой высотой дал бы NaN на uncrouch
    pub fn new(
        tunables: MovementTunables,
        collider: ColliderInfo,
        position: Vec2,
    ) -> Result<Self, ConfigError> {
        tunables.validate()?;

        let prober = GroundProber::new(tunables.ground_layers, tunables.grounded_raycast_distance);

        Ok(Self {
            tunables,
            state: MovementState::new(position),
            collider,
            prober,
            shape_dirty: false,
        })
    }

    /// Контроллер поверх Rapier collider'а (capsule или cuboid, иначе ошибка)
    pub fn from_collider(
        tunables: MovementTunables,
        collider_entity: Entity,
        collider: &Collider,
        offset: Vec2,
        position: Vec2,
    ) -> Result<Self, SpawnError> {
        let info = ColliderInfo::from_collider(collider_entity, collider, offset)?;
        Ok(Self::new(tunables, info, position)?)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn tunables(&self) -> &MovementTunables {
        &self.tunables
    }

    pub fn state(&self) -> &MovementState {
        &self.state
    }

    pub fn collider(&self) -> &ColliderInfo {
        &self.collider
    }

    /// Grounded без single-frame flicker (raw flag стабилен два probe подряд)
    pub fn is_grounded(&self) -> bool {
        self.state.is_stably_grounded()
    }

    pub fn is_crouching(&self) -> bool {
        self.state.is_crouching
    }

    pub fn wants_uncrouch(&self) -> bool {
        self.state.wants_uncrouch
    }

    pub fn is_jumping(&self) -> bool {
        self.state.is_ascending()
    }

    pub fn current_velocity(&self) -> Vec2 {
        self.state.velocity
    }

    pub fn facing(&self) -> Facing {
        self.state.facing
    }

    pub fn gravity(&self) -> f32 {
        self.tunables.gravity()
    }

    pub fn jump_speed(&self) -> f32 {
        self.tunables.jump_speed()
    }

    pub fn ground_raycast_distance(&self) -> f32 {
        self.tunables.grounded_raycast_distance
    }

    /// Max ground speed с учётом приседа
    pub fn max_ground_speed(&self) -> f32 {
        let scale = if self.state.is_crouching {
            self.tunables.crouch_speed_percent
        } else {
            1.0
        };
        self.tunables.ground_max_speed * scale
    }

    /// World-space anchor ground probe (центр нижней полусферы)
    pub fn collider_bottom(&self) -> Vec2 {
        self.state.current_position + self.collider.offset() + Vec2::NEG_Y * self.anchor_inset()
    }

    /// World-space anchor ceiling probe (центр верхней полусферы)
    pub fn collider_top(&self) -> Vec2 {
        self.state.current_position + self.collider.offset() + Vec2::Y * self.anchor_inset()
    }

    fn anchor_inset(&self) -> f32 {
        let size = self.collider.size();
        size.y * 0.5 - size.x * 0.5
    }

    /// Raycast с тем же ground filter (camera, AI line-of-sight). Возвращает hit count
    pub fn raycast_against_ground(
        &self,
        world: &impl RayCaster,
        origin: Vec2,
        direction: Vec2,
        distance: f32,
    ) -> usize {
        usize::from(self.raycast_against_ground_hit(world, origin, direction, distance).is_some())
    }

    pub fn raycast_against_ground_hit(
        &self,
        world: &impl RayCaster,
        origin: Vec2,
        direction: Vec2,
        distance: f32,
    ) -> Option<RayHit> {
        world.raycast(origin, direction, distance, self.tunables.ground_layers)
    }

    // ------------------------------------------------------------------
    // Fixed tick
    // ------------------------------------------------------------------

    /// Fixed tick: порядок шагов фиксирован
    ///
    /// Snap `velocity.y = 0` случается на probe ПОСЛЕ проникающего move —
    /// задержка в один tick заложена в порядок шагов.
    pub fn on_fixed_tick(&mut self, world: &mut impl PhysicsWorld, dt: f32) {
        self.apply_gravity(dt);
        self.integrate(world, dt);
        self.probe_ground(&*world);
        self.retry_uncrouch(&*world);
    }

    /// Gravity только на подъёме; падение сохраняет последнюю заданную velocity
    fn apply_gravity(&mut self, dt: f32) {
        if self.state.is_ascending() {
            self.state.velocity.y -= self.gravity() * dt;
        }
    }

    fn integrate(&mut self, world: &mut impl PhysicsWorld, dt: f32) {
        self.state.previous_position = world.body_position();
        self.state.current_position = self.state.previous_position + self.state.velocity * dt;

        world.move_position(self.state.current_position);
    }

    fn probe_ground(&mut self, world: &impl RayCaster) {
        let was_stable = self.is_grounded();

        self.state.was_grounded_last_frame = self.state.is_grounded;

        let hits = self
            .prober
            .ground_hits(world, self.collider_bottom(), self.collider.size().x);
        self.state.is_grounded = grounded_quorum(hits, self.state.velocity.length());

        if self.state.is_grounded && !self.is_jumping() {
            self.state.velocity.y = 0.0;
        }

        let is_stable = self.is_grounded();
        if is_stable != was_stable {
            logger::log(&format!(
                "CharacterMovement {:?}: grounded {} → {} ({} hits, pos {:?})",
                self.collider.shape_handle(),
                was_stable,
                is_stable,
                hits,
                self.state.current_position
            ));
        }
    }

    fn retry_uncrouch(&mut self, world: &impl RayCaster) {
        if self.state.wants_uncrouch {
            self.un_crouch(world);
        }
    }

    fn is_ceiling_blocked(&self, world: &impl RayCaster) -> bool {
        self.prober
            .ceiling_blocked(world, self.collider_top(), self.collider.size().x)
    }

    // ------------------------------------------------------------------
    // Variable tick / public movement API
    // ------------------------------------------------------------------

    /// Variable tick: horizontal response → jump edge → jump abort
    pub fn on_frame_tick(&mut self, input: FrameInput, dt: f32) -> FrameOutcome {
        let flipped = self.process_movement_input(input.axis, dt);
        let jumped = input.jump_pressed && self.jump();

        if !input.jump_held {
            self.update_jump_abort(dt);
        }

        FrameOutcome { flipped, jumped }
    }

    /// Horizontal approach к `input.x * max_ground_speed`, без overshoot
    ///
    /// Возвращает новый facing, если персонаж развернулся.
    pub fn process_movement_input(&mut self, input: Vec2, dt: f32) -> Option<Facing> {
        let input_x = input.x.clamp(-1.0, 1.0);
        let desired_speed = input_x * self.max_ground_speed();

        // Один rate в обе стороны; ground_deceleration reserved
        self.state.velocity.x = move_towards(
            self.state.velocity.x,
            desired_speed,
            self.tunables.ground_acceleration * dt,
        );

        self.flip_character(input_x)
    }

    /// Flip только при несогласии знаков (0 и тот же знак не разворачивают)
    pub fn flip_character(&mut self, x: f32) -> Option<Facing> {
        let should_flip = match self.state.facing {
            Facing::Right => x < 0.0,
            Facing::Left => x > 0.0,
        };

        if !should_flip {
            return None;
        }

        self.state.facing = self.state.facing.flipped();
        Some(self.state.facing)
    }

    pub fn stop_immediately(&mut self) {
        self.state.velocity = Vec2::ZERO;
    }

    /// Eligibility: стабильно на земле, не на подъёме, не в приседе
    pub fn can_jump(&self) -> bool {
        self.is_grounded() && !self.is_jumping() && !self.is_crouching()
    }

    /// `velocity.y = jump_speed`, если прыжок разрешён
    ///
    /// При `jump_requires_ground == false` gate не проверяется.
    pub fn jump(&mut self) -> bool {
        if self.tunables.jump_requires_ground && !self.can_jump() {
            return false;
        }

        self.state.velocity.y = self.jump_speed();
        true
    }

    /// Обрывает подъём (variable jump height)
    pub fn update_jump_abort(&mut self, dt: f32) {
        if self.is_jumping() {
            self.state.velocity.y -= self.tunables.jump_abort_deceleration * dt;
        }
    }

    /// Standing → Crouching. Отменяет pending uncrouch
    pub fn crouch(&mut self) -> bool {
        self.state.wants_uncrouch = false;

        if self.state.is_crouching {
            return false;
        }

        self.state.is_crouching = true;

        let new_height = self.collider.size().y * self.tunables.crouch_height_percent;
        self.set_height(new_height);

        logger::log(&format!(
            "CharacterMovement {:?}: crouch (height {:.3})",
            self.collider.shape_handle(),
            new_height
        ));
        true
    }

    /// Crouching → Standing, если потолок свободен; иначе deferred
    ///
    /// Deferred uncrouch повторяется каждый fixed tick без лимита:
    /// постоянное препятствие = персонаж остаётся в приседе.
    pub fn un_crouch(&mut self, world: &impl RayCaster) -> bool {
        if !self.state.is_crouching {
            return false;
        }

        let was_pending = self.state.wants_uncrouch;
        self.state.wants_uncrouch = true;

        if self.is_ceiling_blocked(world) {
            if !was_pending {
                logger::log(&format!(
                    "CharacterMovement {:?}: uncrouch deferred (ceiling blocked at {:?})",
                    self.collider.shape_handle(),
                    self.collider_top()
                ));
            }
            return false;
        }

        self.state.wants_uncrouch = false;
        self.state.is_crouching = false;

        let new_height = self.collider.size().y / self.tunables.crouch_height_percent;
        self.set_height(new_height);

        logger::log(&format!(
            "CharacterMovement {:?}: uncrouch{} (height {:.3})",
            self.collider.shape_handle(),
            if was_pending { " after deferral" } else { "" },
            new_height
        ));
        true
    }

    fn set_height(&mut self, new_height: f32) {
        set_bottom_anchored_height(&mut self.collider, new_height);
        self.shape_dirty = true;
    }

    /// true один раз после каждого изменения shape (для sync в Rapier)
    pub fn take_shape_change(&mut self) -> bool {
        std::mem::take(&mut self.shape_dirty)
    }
}

/// Сдвигает `current` к `target` не больше чем на `max_delta`
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}
