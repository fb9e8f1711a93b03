//! Weapon mode selection and input routing

use glam::Vec3;
use graviton_core::Transform;
use graviton_physics::{AimRay, PhysicsBodies};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{AttachmentTarget, FeedbackSink, FireFeedback, GrabController, GrabError, ProjectileSpawner};

/// Which behavior the fire input drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponMode {
    #[default]
    Projectile,
    Gravity,
}

/// Everything a routed weapon action may touch
pub struct FireContext<'a, S: PhysicsBodies> {
    pub scene: &'a mut S,
    pub grab: &'a mut GrabController<S::Body>,
    pub target: &'a AttachmentTarget,
    /// Aim ray for grab traces; its direction is the launch direction
    pub aim: AimRay,
    /// Projectile spawn point and orientation
    pub muzzle: Transform,
    /// Projectile launcher, if one is equipped
    pub spawner: Option<&'a mut dyn ProjectileSpawner<S>>,
    pub feedback: &'a FireFeedback,
    pub sink: Option<&'a mut dyn FeedbackSink>,
    /// Where fire sounds are played
    pub listener: Vec3,
}

impl<S: PhysicsBodies> FireContext<'_, S> {
    fn play_feedback(&mut self) {
        if let Some(sink) = self.sink.as_deref_mut() {
            self.feedback.trigger(sink, self.listener);
        }
    }
}

/// Result of a fire press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome<B> {
    /// A projectile entered the world
    ProjectileSpawned(B),
    /// The launcher refused to spawn (muzzle blocked)
    ProjectileBlocked,
    /// Projectile mode with no launcher equipped
    NoLauncher,
    /// The gravity gun picked up a body
    Grabbed(B),
    /// The gravity gun found nothing to pick up
    GrabFailed(GrabError),
}

/// Current weapon mode plus routing of fire/launch input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeaponModeSelector {
    mode: WeaponMode,
}

impl WeaponModeSelector {
    pub fn new(mode: WeaponMode) -> Self {
        Self { mode }
    }

    /// Switch modes; selecting the current mode is allowed and changes nothing
    pub fn set_mode(&mut self, mode: WeaponMode) {
        info!("Changing to {:?} weapon", mode);
        self.mode = mode;
    }

    pub fn current_mode(&self) -> WeaponMode {
        self.mode
    }

    /// Fire pressed: shoot a projectile or try to grab, depending on mode
    pub fn route_fire_pressed<S: PhysicsBodies>(
        &self,
        mut ctx: FireContext<'_, S>,
    ) -> FireOutcome<S::Body> {
        match self.mode {
            WeaponMode::Projectile => {
                let Some(spawner) = ctx.spawner.as_deref_mut() else {
                    debug!("Fire ignored, no launcher equipped");
                    return FireOutcome::NoLauncher;
                };
                let spawned =
                    spawner.spawn(ctx.scene, ctx.muzzle.position, ctx.muzzle.rotation);
                ctx.play_feedback();
                match spawned {
                    Some(body) => FireOutcome::ProjectileSpawned(body),
                    None => FireOutcome::ProjectileBlocked,
                }
            }
            WeaponMode::Gravity => match ctx.grab.try_grab(ctx.scene, &ctx.aim, ctx.target) {
                Ok(body) => FireOutcome::Grabbed(body),
                Err(err) => {
                    debug!(%err, "Grab failed");
                    FireOutcome::GrabFailed(err)
                }
            },
        }
    }

    /// Fire released: drop a held body in gravity mode
    pub fn route_fire_released<S: PhysicsBodies>(&self, ctx: FireContext<'_, S>) -> bool {
        match self.mode {
            WeaponMode::Projectile => false,
            WeaponMode::Gravity => ctx.grab.release(ctx.scene),
        }
    }

    /// Launch pressed: throw whatever is held, in either mode
    pub fn route_launch<S: PhysicsBodies>(&self, mut ctx: FireContext<'_, S>) -> bool {
        let launched = ctx.grab.launch(ctx.scene, ctx.aim.direction);
        if launched {
            ctx.play_feedback();
        }
        launched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapon::grab::tests::{Call, FakeBody, FakeScene};
    use crate::weapon::LogFeedback;
    use glam::Quat;
    use graviton_physics::AnchorId;

    const B: u32 = 3;

    /// Spawner that hands out sequential ids or refuses
    #[derive(Default)]
    struct FakeSpawner {
        blocked: bool,
        spawned: Vec<(Vec3, Quat)>,
    }

    impl ProjectileSpawner<FakeScene> for FakeSpawner {
        fn spawn(&mut self, _scene: &mut FakeScene, location: Vec3, rotation: Quat) -> Option<u32> {
            if self.blocked {
                return None;
            }
            self.spawned.push((location, rotation));
            Some(100 + self.spawned.len() as u32)
        }
    }

    struct Rig {
        scene: FakeScene,
        grab: GrabController<u32>,
        target: AttachmentTarget,
        spawner: FakeSpawner,
        feedback: FireFeedback,
        sink: LogFeedback,
    }

    impl Rig {
        fn new() -> Self {
            let mut scene = FakeScene::default();
            scene.bodies.insert(B, FakeBody::dynamic());
            scene.aim_at(Some(B), 50.0);
            Self {
                scene,
                grab: GrabController::new(5000.0, 5000.0),
                target: AttachmentTarget::new(AnchorId(0), Transform::default()),
                spawner: FakeSpawner::default(),
                feedback: FireFeedback::default(),
                sink: LogFeedback::default(),
            }
        }

        fn ctx(&mut self) -> FireContext<'_, FakeScene> {
            FireContext {
                scene: &mut self.scene,
                grab: &mut self.grab,
                target: &self.target,
                aim: AimRay::new(Vec3::ZERO, Vec3::NEG_Z),
                muzzle: Transform::from_position(Vec3::new(0.0, 1.0, -1.0)),
                spawner: Some(&mut self.spawner),
                feedback: &self.feedback,
                sink: Some(&mut self.sink),
                listener: Vec3::ZERO,
            }
        }
    }

    #[test]
    fn test_default_mode_is_projectile() {
        assert_eq!(WeaponModeSelector::default().current_mode(), WeaponMode::Projectile);
    }

    #[test]
    fn test_set_mode_is_idempotent() {
        let mut selector = WeaponModeSelector::default();
        selector.set_mode(WeaponMode::Gravity);
        selector.set_mode(WeaponMode::Gravity);
        assert_eq!(selector.current_mode(), WeaponMode::Gravity);
        selector.set_mode(WeaponMode::Projectile);
        assert_eq!(selector.current_mode(), WeaponMode::Projectile);
    }

    #[test]
    fn test_projectile_fire_spawns_and_plays_feedback() {
        let mut rig = Rig::new();
        let selector = WeaponModeSelector::default();

        assert_eq!(
            selector.route_fire_pressed(rig.ctx()),
            FireOutcome::ProjectileSpawned(101)
        );
        assert_eq!(rig.spawner.spawned, vec![(Vec3::new(0.0, 1.0, -1.0), Quat::IDENTITY)]);
        assert_eq!(rig.sink.sounds_played, 1);
        assert_eq!(rig.grab.grabbed(), None);
        assert!(rig.scene.calls.is_empty());
    }

    #[test]
    fn test_blocked_projectile_still_plays_feedback() {
        let mut rig = Rig::new();
        rig.spawner.blocked = true;

        let outcome = WeaponModeSelector::default().route_fire_pressed(rig.ctx());
        assert_eq!(outcome, FireOutcome::ProjectileBlocked);
        assert_eq!(rig.sink.sounds_played, 1);
    }

    #[test]
    fn test_projectile_fire_without_launcher_is_silent() {
        let mut rig = Rig::new();
        let mut ctx = rig.ctx();
        ctx.spawner = None;

        let outcome = WeaponModeSelector::default().route_fire_pressed(ctx);
        assert_eq!(outcome, FireOutcome::NoLauncher);
        assert_eq!(rig.sink.sounds_played, 0);
    }

    #[test]
    fn test_gravity_fire_grabs() {
        let mut rig = Rig::new();
        let selector = WeaponModeSelector::new(WeaponMode::Gravity);

        assert_eq!(selector.route_fire_pressed(rig.ctx()), FireOutcome::Grabbed(B));
        assert_eq!(rig.grab.grabbed(), Some(B));
        assert!(rig.spawner.spawned.is_empty());
        assert_eq!(rig.sink.sounds_played, 0);
    }

    #[test]
    fn test_gravity_fire_reports_missing_target() {
        let mut rig = Rig::new();
        rig.scene.hit = None;
        let selector = WeaponModeSelector::new(WeaponMode::Gravity);

        assert!(matches!(
            selector.route_fire_pressed(rig.ctx()),
            FireOutcome::GrabFailed(GrabError::NoTarget(_))
        ));
    }

    #[test]
    fn test_fire_released_only_releases_in_gravity_mode() {
        let mut rig = Rig::new();
        let mut selector = WeaponModeSelector::new(WeaponMode::Gravity);
        selector.route_fire_pressed(rig.ctx());

        selector.set_mode(WeaponMode::Projectile);
        assert!(!selector.route_fire_released(rig.ctx()));
        assert_eq!(rig.grab.grabbed(), Some(B));

        selector.set_mode(WeaponMode::Gravity);
        assert!(selector.route_fire_released(rig.ctx()));
        assert_eq!(rig.grab.grabbed(), None);
        assert!(rig.scene.body(B).simulating);
    }

    #[test]
    fn test_switching_modes_keeps_held_object() {
        let mut rig = Rig::new();
        let mut selector = WeaponModeSelector::new(WeaponMode::Gravity);
        selector.route_fire_pressed(rig.ctx());

        selector.set_mode(WeaponMode::Projectile);
        assert_eq!(rig.grab.grabbed(), Some(B));
        assert!(!rig.scene.body(B).simulating);
    }

    #[test]
    fn test_launch_routes_in_any_mode() {
        let mut rig = Rig::new();
        let mut selector = WeaponModeSelector::new(WeaponMode::Gravity);
        selector.route_fire_pressed(rig.ctx());
        selector.set_mode(WeaponMode::Projectile);
        rig.scene.calls.clear();

        assert!(selector.route_launch(rig.ctx()));
        assert_eq!(
            rig.scene.calls.last(),
            Some(&Call::Impulse(B, Vec3::new(0.0, 0.0, -5000.0)))
        );
        assert_eq!(rig.sink.sounds_played, 1);
    }

    #[test]
    fn test_launch_when_empty_plays_nothing() {
        let mut rig = Rig::new();
        let selector = WeaponModeSelector::new(WeaponMode::Gravity);

        assert!(!selector.route_launch(rig.ctx()));
        assert_eq!(rig.sink.sounds_played, 0);
        assert!(rig.scene.calls.is_empty());
    }
}
