//! The first-person character: capsule, camera and weapon in one place
//!
//! Each fixed step applies look and movement input, moves the hold anchor to
//! follow the view, then routes weapon input through the mode selector.

use glam::Vec3;
use graviton_core::Transform;
use graviton_physics::{CapsuleConfig, PhysicsWorld, ProjectilePool, RigidBodyHandle};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::camera::{CameraConfig, FirstPersonCamera};
use crate::input::{InputAction, InputState};
use crate::weapon::{
    AttachmentTarget, FeedbackSink, FireContext, FireOutcome, GrabController, ProjectileSpawner,
    WeaponConfig, WeaponMode, WeaponModeSelector,
};

use super::{MovementConfig, PlayerController};

/// Everything needed to build a character
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub movement: MovementConfig,
    pub capsule: CapsuleConfig,
    pub camera: CameraConfig,
    pub weapon: WeaponConfig,
}

/// Weapon actions that happened during one fixed step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeaponActions {
    pub fired: Option<FireOutcome<RigidBodyHandle>>,
    pub released: bool,
    pub launched: bool,
}

/// A spawned first-person character
pub struct FirstPersonCharacter {
    pub movement: PlayerController,
    pub camera: FirstPersonCamera,
    pub weapon: WeaponConfig,
    selector: WeaponModeSelector,
    grab: GrabController<RigidBodyHandle>,
    hold: AttachmentTarget,
}

impl FirstPersonCharacter {
    /// Spawn the capsule at `position` and register the hold anchor
    pub fn spawn(physics: &mut PhysicsWorld, position: Vec3, config: PlayerConfig) -> Self {
        let mut movement = PlayerController::with_config(config.movement, config.capsule);
        movement.spawn(physics, position);

        let mut camera = FirstPersonCamera::with_config(config.camera);
        camera.follow(movement.eye_position());

        let offset = config.weapon.hold_offset;
        let hold_transform = camera.view_transform().mul_transform(&offset);
        let hold = AttachmentTarget::new(physics.create_anchor(hold_transform), offset);

        info!(?position, "Spawned first-person character");
        Self {
            movement,
            camera,
            grab: GrabController::from_config(&config.weapon),
            weapon: config.weapon,
            selector: WeaponModeSelector::default(),
            hold,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.movement.position()
    }

    pub fn weapon_mode(&self) -> WeaponMode {
        self.selector.current_mode()
    }

    /// Switch weapon modes; a held object stays held
    pub fn select_mode(&mut self, mode: WeaponMode) {
        self.selector.set_mode(mode);
    }

    /// The body held by the gravity gun, if any
    pub fn grabbed(&self) -> Option<RigidBodyHandle> {
        self.grab.grabbed()
    }

    pub fn hold_target(&self) -> &AttachmentTarget {
        &self.hold
    }

    /// Where projectiles leave the weapon
    pub fn muzzle(&self) -> Transform {
        let view = self.camera.view_transform();
        Transform::from_position_rotation(view.transform_point(self.weapon.muzzle_offset), view.rotation)
    }

    /// Advance one fixed step
    pub fn fixed_update(
        &mut self,
        physics: &mut PhysicsWorld,
        mut projectiles: Option<&mut ProjectilePool>,
        input: &InputState,
        mut sink: Option<&mut dyn FeedbackSink>,
        dt: f32,
    ) -> WeaponActions {
        self.camera.update(input, self.movement.eye_position(), dt);
        self.movement.fixed_update(physics, input, self.camera.yaw, dt);
        self.camera.follow(self.movement.eye_position());

        let hold_transform = self.hold.world_transform(&self.camera.view_transform());
        physics.set_anchor_transform(self.hold.anchor(), hold_transform);

        if input.is_just_pressed(InputAction::SelectProjectileMode) {
            self.select_mode(WeaponMode::Projectile);
        }
        if input.is_just_pressed(InputAction::SelectGravityMode) {
            self.select_mode(WeaponMode::Gravity);
        }

        let selector = self.selector;
        let mut actions = WeaponActions::default();

        if input.is_just_pressed(InputAction::Fire) {
            let spawner = projectiles
                .as_deref_mut()
                .map(|pool| pool as &mut dyn ProjectileSpawner<PhysicsWorld>);
            let ctx = self.fire_context(physics, spawner, sink.as_deref_mut());
            actions.fired = Some(selector.route_fire_pressed(ctx));
        }
        if input.is_just_released(InputAction::Fire) {
            let ctx = self.fire_context(physics, None, sink.as_deref_mut());
            actions.released = selector.route_fire_released(ctx);
        }
        if input.is_just_pressed(InputAction::Launch) {
            let ctx = self.fire_context(physics, None, sink.as_deref_mut());
            actions.launched = selector.route_launch(ctx);
        }

        actions
    }

    fn fire_context<'a>(
        &'a mut self,
        physics: &'a mut PhysicsWorld,
        spawner: Option<&'a mut dyn ProjectileSpawner<PhysicsWorld>>,
        sink: Option<&'a mut (dyn FeedbackSink + '_)>,
    ) -> FireContext<'a, PhysicsWorld> {
        let muzzle = self.muzzle();
        FireContext {
            scene: physics,
            grab: &mut self.grab,
            target: &self.hold,
            aim: self.camera.aim_ray(),
            muzzle,
            spawner,
            feedback: &self.weapon.feedback,
            sink: sink.map(|sink| sink as &mut dyn FeedbackSink),
            listener: self.movement.position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapon::LogFeedback;
    use glam::Quat;
    use graviton_physics::{PhysicsBodies, ProjectileConfig};

    const DT: f32 = 1.0 / 60.0;

    struct Arena {
        physics: PhysicsWorld,
        player: FirstPersonCharacter,
        pool: ProjectilePool,
        sink: LogFeedback,
        input: InputState,
    }

    impl Arena {
        /// Ground, the player at the origin facing -Z and a crate at eye height
        fn new() -> (Self, RigidBodyHandle) {
            let mut physics = PhysicsWorld::new();
            physics.create_ground(0.0);
            let player = FirstPersonCharacter::spawn(&mut physics, Vec3::ZERO, PlayerConfig::default());
            let eye = player.camera.position();
            let body = physics.spawn_dynamic_box(Vec3::splat(0.5), eye + Vec3::new(0.0, 0.0, -6.0));
            physics.refresh_queries();

            let arena = Self {
                physics,
                player,
                pool: ProjectilePool::default(),
                sink: LogFeedback::default(),
                input: InputState::new(),
            };
            (arena, body)
        }

        fn tick(&mut self) -> WeaponActions {
            let actions = self.player.fixed_update(
                &mut self.physics,
                Some(&mut self.pool),
                &self.input,
                Some(&mut self.sink),
                DT,
            );
            self.input.clear_frame();
            actions
        }

        fn tap(&mut self, action: InputAction) -> WeaponActions {
            self.input.press(action);
            let actions = self.tick();
            self.input.release(action);
            actions
        }
    }

    #[test]
    fn test_spawn_defaults() {
        let (arena, _) = Arena::new();
        assert_eq!(arena.player.weapon_mode(), WeaponMode::Projectile);
        assert_eq!(arena.player.grabbed(), None);
        let anchor = arena.player.hold_target().anchor();
        assert!(arena.physics.anchor_transform(anchor).is_some());
    }

    #[test]
    fn test_fire_in_projectile_mode_spawns_projectile() {
        let (mut arena, body) = Arena::new();
        let actions = arena.tap(InputAction::Fire);

        assert!(matches!(actions.fired, Some(FireOutcome::ProjectileSpawned(_))));
        assert_eq!(arena.pool.live().len(), 1);
        assert_eq!(arena.sink.sounds_played, 1);
        assert_eq!(arena.sink.animations_played, 1);
        assert!(arena.physics.is_simulating_physics(body));
    }

    #[test]
    fn test_mode_keys_switch_modes() {
        let (mut arena, _) = Arena::new();
        arena.tap(InputAction::SelectGravityMode);
        assert_eq!(arena.player.weapon_mode(), WeaponMode::Gravity);
        arena.tap(InputAction::SelectProjectileMode);
        assert_eq!(arena.player.weapon_mode(), WeaponMode::Projectile);
    }

    #[test]
    fn test_grab_pins_crate_to_hold_anchor() {
        let (mut arena, body) = Arena::new();
        arena.player.select_mode(WeaponMode::Gravity);

        arena.input.press(InputAction::Fire);
        let actions = arena.tick();
        assert_eq!(actions.fired, Some(FireOutcome::Grabbed(body)));
        assert_eq!(arena.player.grabbed(), Some(body));
        assert!(!arena.physics.is_simulating_physics(body));
        assert_eq!(arena.sink.sounds_played, 0);

        // Keep holding fire and let the body follow the anchor
        for _ in 0..5 {
            arena.physics.step();
            arena.tick();
        }
        let anchor = arena.player.hold_target().anchor();
        let hold = arena.physics.anchor_transform(anchor).unwrap();
        let pose = arena.physics.body_transform(body).unwrap();
        assert!((pose.position - hold.position).length() < 0.05);
    }

    #[test]
    fn test_releasing_fire_drops_crate() {
        let (mut arena, body) = Arena::new();
        arena.player.select_mode(WeaponMode::Gravity);

        let actions = arena.tap(InputAction::Fire);
        assert_eq!(actions.fired, Some(FireOutcome::Grabbed(body)));
        let actions = arena.tick();
        assert!(actions.released);
        assert_eq!(arena.player.grabbed(), None);
        assert!(arena.physics.is_simulating_physics(body));
        assert_eq!(arena.physics.attachment_of(body), None);
    }

    #[test]
    fn test_launch_throws_crate_along_view() {
        let (mut arena, body) = Arena::new();
        arena.player.select_mode(WeaponMode::Gravity);
        arena.input.press(InputAction::Fire);
        arena.tick();

        arena.input.press(InputAction::Launch);
        let actions = arena.tick();
        assert!(actions.launched);
        assert_eq!(arena.player.grabbed(), None);

        let velocity = arena.physics.body_velocity(body).unwrap();
        let forward = arena.player.camera.forward();
        assert!((velocity - forward * 5000.0).length() < 1.0);
        assert_eq!(arena.sink.sounds_played, 1);
    }

    #[test]
    fn test_launch_works_after_switching_back_to_projectile() {
        let (mut arena, body) = Arena::new();
        arena.player.select_mode(WeaponMode::Gravity);
        arena.input.press(InputAction::Fire);
        arena.tick();

        arena.player.select_mode(WeaponMode::Projectile);
        assert_eq!(arena.player.grabbed(), Some(body));

        arena.input.press(InputAction::Launch);
        assert!(arena.tick().launched);
        assert!(arena.physics.is_simulating_physics(body));
    }

    #[test]
    fn test_fire_without_launcher() {
        let (mut arena, _) = Arena::new();
        arena.input.press(InputAction::Fire);
        let actions = arena.player.fixed_update(
            &mut arena.physics,
            None,
            &arena.input,
            Some(&mut arena.sink),
            DT,
        );
        assert_eq!(actions.fired, Some(FireOutcome::NoLauncher));
        assert_eq!(arena.sink.sounds_played, 0);
    }

    #[test]
    fn test_held_projectile_survives_until_released() {
        let (mut arena, _) = Arena::new();
        arena.pool = ProjectilePool::new(ProjectileConfig {
            radius: 0.3,
            lifespan: 0.5,
            ..Default::default()
        });
        let muzzle = arena.player.camera.position() + Vec3::new(0.0, 0.0, -3.0);
        let projectile = arena
            .pool
            .spawn(&mut arena.physics, muzzle, Quat::IDENTITY)
            .unwrap();
        arena.physics.refresh_queries();

        arena.tap(InputAction::SelectGravityMode);
        arena.input.press(InputAction::Fire);
        let actions = arena.tick();
        assert_eq!(actions.fired, Some(FireOutcome::Grabbed(projectile)));

        for _ in 0..60 {
            arena.physics.step();
            arena.tick();
            arena.pool.update(&mut arena.physics, DT);
        }
        assert_eq!(arena.player.grabbed(), Some(projectile));
        assert_eq!(arena.pool.live().len(), 1);
        assert!(arena.physics.get_rigid_body(projectile).is_some());
        assert!(!arena.physics.is_simulating_physics(projectile));

        arena.input.release(InputAction::Fire);
        assert!(arena.tick().released);
        for _ in 0..60 {
            arena.physics.step();
            arena.tick();
            arena.pool.update(&mut arena.physics, DT);
        }
        assert_eq!(arena.player.grabbed(), None);
        assert!(arena.pool.live().is_empty());
        assert!(arena.physics.get_rigid_body(projectile).is_none());
    }
}
