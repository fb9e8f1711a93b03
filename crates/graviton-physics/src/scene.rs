//! Contracts between the gravity gun and whatever world hosts the bodies
//!
//! The grab controller only talks to these traits. [`crate::PhysicsWorld`]
//! implements them over rapier3d; tests implement them with recording fakes.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Identifier of a world transform that bodies can be pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorId(pub u32);

/// A ray used for aiming: an origin and a unit-length direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl AimRay {
    /// Build a ray, normalizing `direction` (zero stays zero)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at `distance` along the ray
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Nearest hit of a world query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<B> {
    /// The body that was hit, `None` for static geometry
    pub body: Option<B>,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at the hit point
    pub normal: Vec3,
    /// Distance from the ray origin
    pub distance: f32,
}

/// Nearest-hit ray queries against the world
pub trait WorldQuery {
    /// Handle identifying a body in this world
    type Body: Copy + Eq + fmt::Debug;

    /// Nearest hit along `ray` no further than `max_distance`
    fn raycast(&self, ray: &AimRay, max_distance: f32) -> Option<RayHit<Self::Body>>;
}

/// Simulation and attachment control over individual bodies
///
/// Every operation on a body that no longer exists is a silent no-op.
pub trait PhysicsBodies: WorldQuery {
    /// Whether the body can be simulated at all (fixed bodies cannot)
    fn supports_simulation(&self, body: Self::Body) -> bool;

    /// Whether the body is currently driven by the solver
    fn is_simulating_physics(&self, body: Self::Body) -> bool;

    /// Hand the body to the solver, or take it away and freeze it in place
    fn set_simulating_physics(&mut self, body: Self::Body, simulate: bool);

    /// Drop any parent attachment, keeping the current world pose
    fn detach_preserving_world_transform(&mut self, body: Self::Body);

    /// Pin the body to `anchor`, snapping position and orientation to it
    fn attach_to_snapped(&mut self, body: Self::Body, anchor: AnchorId);

    /// Apply a single instantaneous impulse
    fn apply_impulse(&mut self, body: Self::Body, impulse: Vec3);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_ray_normalizes_direction() {
        let ray = AimRay::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0));
        assert_eq!(ray.direction, Vec3::NEG_Z);
        assert_eq!(ray.at(3.0), Vec3::new(0.0, 0.0, -3.0));
    }

    #[test]
    fn test_aim_ray_zero_direction() {
        let ray = AimRay::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(ray.direction, Vec3::ZERO);
        assert_eq!(ray.at(10.0), Vec3::ONE);
    }
}
