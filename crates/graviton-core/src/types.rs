//! Core types used throughout Graviton

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, rotation and scale of an object in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Create a new transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Map a point from this transform's local space into its parent space
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (self.scale * point)
    }

    /// Compose `self` (parent) with a child transform expressed in parent space
    ///
    /// Scale is not propagated into the child's rotation, which is all the
    /// first-person rig ever needs.
    pub fn mul_transform(&self, child: &Transform) -> Transform {
        Transform {
            position: self.transform_point(child.position),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_point_applies_scale_then_rotation() {
        let transform = Transform {
            position: Vec3::new(1.0, 0.0, 0.0),
            rotation: Quat::from_rotation_y(std::f32::consts::PI),
            scale: Vec3::splat(2.0),
        };
        let point = transform.transform_point(Vec3::new(0.0, 0.0, -1.0));
        assert!((point - Vec3::new(1.0, 0.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_mul_transform_offsets_along_parent_rotation() {
        let parent = Transform::from_position_rotation(
            Vec3::new(0.0, 1.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );
        let child = Transform::from_position(Vec3::new(0.0, 0.0, -2.0));

        let world = parent.mul_transform(&child);

        // A quarter turn to the left points local -Z at world -X
        assert!((world.position - Vec3::new(-2.0, 1.0, 0.0)).length() < 1e-5);
        assert!(world.rotation.abs_diff_eq(parent.rotation, 1e-5));
    }
}
