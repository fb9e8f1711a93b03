//! The player's kinematic capsule
//!
//! A parentless capsule collider swept through the world by rapier's kinematic
//! character controller. Its position is tracked at the feet.

use glam::Vec3;
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::PhysicsWorld;

/// Capsule shape and sweep tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsuleConfig {
    /// Total height in meters
    pub height: f32,
    pub radius: f32,
    /// Eye height above the feet
    pub eye_height: f32,
    /// Steepest walkable slope in degrees
    pub max_slope_angle: f32,
    /// Tallest ledge stepped over automatically
    pub step_height: f32,
    /// Gap kept between the capsule and geometry
    pub skin_width: f32,
    /// Distance pulled down onto slopes and stairs, `None` to disable
    pub ground_snap: Option<f32>,
}

impl Default for CapsuleConfig {
    fn default() -> Self {
        Self {
            height: 1.8,
            radius: 0.4,
            eye_height: 1.7,
            max_slope_angle: 45.0,
            step_height: 0.25,
            skin_width: 0.02,
            ground_snap: Some(0.2),
        }
    }
}

/// Kinematic capsule driven by velocity
pub struct PlayerCapsule {
    pub config: CapsuleConfig,
    feet: Vec3,
    grounded: bool,
    collider: Option<ColliderHandle>,
    sweeper: KinematicCharacterController,
}

impl PlayerCapsule {
    pub fn new(config: CapsuleConfig) -> Self {
        let slope = config.max_slope_angle.to_radians();
        let sweeper = KinematicCharacterController {
            max_slope_climb_angle: slope,
            min_slope_slide_angle: slope,
            autostep: Some(CharacterAutostep {
                max_height: CharacterLength::Absolute(config.step_height),
                min_width: CharacterLength::Relative(0.5),
                include_dynamic_bodies: true,
            }),
            snap_to_ground: config.ground_snap.map(CharacterLength::Absolute),
            offset: CharacterLength::Absolute(config.skin_width),
            ..Default::default()
        };

        Self {
            config,
            feet: Vec3::ZERO,
            grounded: false,
            collider: None,
            sweeper,
        }
    }

    /// Insert the capsule collider with its feet at `feet`
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, feet: Vec3) -> ColliderHandle {
        self.feet = feet;
        let half_segment = (self.config.height * 0.5 - self.config.radius).max(0.01);
        let center = self.center();
        let collider = ColliderBuilder::capsule_y(half_segment, self.config.radius)
            .translation(vector![center.x, center.y, center.z])
            .friction(0.0)
            .build();

        let handle = physics.add_static_collider(collider);
        self.collider = Some(handle);
        handle
    }

    /// Sweep the capsule along `velocity * dt`, sliding along whatever it hits
    pub fn update(&mut self, physics: &mut PhysicsWorld, velocity: Vec3, dt: f32) {
        let Some(handle) = self.collider else {
            return;
        };
        let Some(shape) = physics.get_collider(handle).map(|c| c.shared_shape().clone()) else {
            return;
        };

        let center = self.center();
        let desired = velocity * dt;
        let movement = self.sweeper.move_shape(
            dt,
            &physics.bodies,
            &physics.colliders,
            &physics.queries,
            &*shape,
            &Isometry::translation(center.x, center.y, center.z),
            vector![desired.x, desired.y, desired.z],
            QueryFilter::default().exclude_collider(handle),
            |_| {},
        );

        let moved = movement.translation;
        self.feet += Vec3::new(moved.x, moved.y, moved.z);
        self.grounded = movement.grounded;

        let center = self.center();
        if let Some(collider) = physics.colliders.get_mut(handle) {
            collider.set_translation(vector![center.x, center.y, center.z]);
        }
    }

    /// Position of the feet
    pub fn feet(&self) -> Vec3 {
        self.feet
    }

    pub fn eye_position(&self) -> Vec3 {
        self.feet + Vec3::Y * self.config.eye_height
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn center(&self) -> Vec3 {
        self.feet + Vec3::Y * (self.config.height * 0.5)
    }
}
