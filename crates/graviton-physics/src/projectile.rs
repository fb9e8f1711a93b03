//! Bouncing projectiles fired by the launcher
//!
//! A projectile is a small CCD ball. It bounces off static geometry, pushes the
//! first simulating body it touches and disappears, and expires after its
//! lifespan either way. A projectile held by the gravity gun is left alone
//! until it is released.

use glam::{Quat, Vec3};
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::PhysicsWorld;

/// Projectile tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Ball radius in meters
    pub radius: f32,
    /// Muzzle speed in meters per second
    pub initial_speed: f32,
    /// Bounciness against static geometry
    pub restitution: f32,
    /// Collider density
    pub density: f32,
    /// Seconds before the projectile is removed
    pub lifespan: f32,
    /// Momentum handed to a struck body, as a multiple of the projectile velocity
    pub hit_impulse_scale: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            radius: 0.05,
            initial_speed: 30.0,
            restitution: 0.6,
            density: 2.0,
            lifespan: 3.0,
            hit_impulse_scale: 1.0,
        }
    }
}

/// A live projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    /// Seconds since spawn
    pub age: f32,
    /// Velocity before the latest step, i.e. before any bounce it produced
    pub velocity: Vec3,
}

/// A projectile striking a simulating body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileHit {
    /// The body that was pushed
    pub body: RigidBodyHandle,
    /// Where the projectile was when it hit
    pub location: Vec3,
    /// Impulse applied to the body
    pub impulse: Vec3,
}

/// Owns every projectile in flight
#[derive(Debug, Default)]
pub struct ProjectilePool {
    pub config: ProjectileConfig,
    live: Vec<Projectile>,
}

impl ProjectilePool {
    pub fn new(config: ProjectileConfig) -> Self {
        Self {
            config,
            live: Vec::new(),
        }
    }

    /// Projectiles currently in flight
    pub fn live(&self) -> &[Projectile] {
        &self.live
    }

    /// Spawn a projectile flying along `rotation`'s forward axis (local -Z)
    ///
    /// Returns `None` without spawning when the muzzle point is inside geometry.
    pub fn spawn(
        &mut self,
        physics: &mut PhysicsWorld,
        location: Vec3,
        rotation: Quat,
    ) -> Option<RigidBodyHandle> {
        if physics.is_space_occupied(location, self.config.radius) {
            debug!(?location, "Projectile spawn blocked");
            return None;
        }

        let velocity = rotation * -Vec3::Z * self.config.initial_speed;
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![location.x, location.y, location.z])
            .linvel(vector![velocity.x, velocity.y, velocity.z])
            .ccd_enabled(true)
            .build();
        let collider = ColliderBuilder::ball(self.config.radius)
            .restitution(self.config.restitution)
            .density(self.config.density)
            .build();

        let (body, collider) = physics.add_dynamic_body(body, collider);
        self.live.push(Projectile {
            body,
            collider,
            age: 0.0,
            velocity,
        });
        Some(body)
    }

    /// Age projectiles, resolve hits from the last physics step, and expire old ones
    ///
    /// Projectiles attached to an anchor neither age nor hit anything.
    pub fn update(&mut self, physics: &mut PhysicsWorld, dt: f32) -> Vec<ProjectileHit> {
        let mut hits = Vec::new();
        let lifespan = self.config.lifespan;
        let impulse_scale = self.config.hit_impulse_scale;

        self.live.retain_mut(|projectile| {
            if physics.attachment_of(projectile.body).is_some() {
                projectile.velocity = Vec3::ZERO;
                return true;
            }

            projectile.age += dt;

            if let Some(hit) = Self::resolve_hit(physics, projectile, impulse_scale) {
                hits.push(hit);
                physics.remove_rigid_body(projectile.body);
                return false;
            }

            if projectile.age >= lifespan {
                physics.remove_rigid_body(projectile.body);
                return false;
            }

            if let Some(velocity) = physics.body_velocity(projectile.body) {
                projectile.velocity = velocity;
            }
            true
        });

        hits
    }

    /// Push the first simulating body the projectile is touching
    fn resolve_hit(
        physics: &mut PhysicsWorld,
        projectile: &Projectile,
        impulse_scale: f32,
    ) -> Option<ProjectileHit> {
        let location = physics.body_transform(projectile.body)?.position;

        let target = physics
            .touching_colliders(projectile.collider)
            .into_iter()
            .filter_map(|collider| physics.get_collider(collider)?.parent())
            .find(|handle| {
                physics
                    .get_rigid_body(*handle)
                    .is_some_and(|body| body.is_dynamic())
            })?;

        let impulse = projectile.velocity * impulse_scale;
        let body = physics.get_rigid_body_mut(target)?;
        body.apply_impulse_at_point(
            vector![impulse.x, impulse.y, impulse.z],
            point![location.x, location.y, location.z],
            true,
        );

        debug!(?target, ?impulse, "Projectile hit");
        Some(ProjectileHit {
            body: target,
            location,
            impulse,
        })
    }
}
