//! rapier3d implementation of the body-control contracts
//!
//! Disabling simulation turns a body into a position-based kinematic body so it
//! keeps colliding while it follows its anchor. Enabling it makes the body
//! dynamic again.

use glam::{Quat, Vec3};
use graviton_core::Transform;
use nalgebra::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::{Isometry, RigidBodyHandle, RigidBodyType, Vector};
use tracing::debug;

use crate::scene::{AimRay, AnchorId, PhysicsBodies, RayHit, WorldQuery};
use crate::{ImpulseMode, PhysicsWorld};

/// Convert a transform to a rapier pose (scale is dropped)
pub fn to_isometry(transform: &Transform) -> Isometry<f32> {
    let p = transform.position;
    let q = transform.rotation;
    Isometry::from_parts(
        Translation3::new(p.x, p.y, p.z),
        UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z)),
    )
}

/// Convert a rapier pose to a unit-scale transform
pub fn from_isometry(pose: &Isometry<f32>) -> Transform {
    let t = pose.translation.vector;
    let q = pose.rotation.quaternion().coords;
    Transform::from_position_rotation(
        Vec3::new(t.x, t.y, t.z),
        Quat::from_xyzw(q.x, q.y, q.z, q.w),
    )
}

fn to_vector(v: Vec3) -> Vector<f32> {
    Vector::new(v.x, v.y, v.z)
}

impl WorldQuery for PhysicsWorld {
    type Body = RigidBodyHandle;

    fn raycast(&self, ray: &AimRay, max_distance: f32) -> Option<RayHit<RigidBodyHandle>> {
        self.raycast_detailed(ray.origin, ray.direction, max_distance)
            .map(|hit| RayHit {
                body: hit.body,
                point: hit.point,
                normal: hit.normal,
                distance: hit.distance,
            })
    }
}

impl PhysicsBodies for PhysicsWorld {
    fn supports_simulation(&self, body: RigidBodyHandle) -> bool {
        self.bodies
            .get(body)
            .is_some_and(|rb| !rb.is_fixed())
    }

    fn is_simulating_physics(&self, body: RigidBodyHandle) -> bool {
        self.bodies
            .get(body)
            .is_some_and(|rb| rb.is_dynamic())
    }

    fn set_simulating_physics(&mut self, body: RigidBodyHandle, simulate: bool) {
        let Some(rb) = self.bodies.get_mut(body) else {
            return;
        };
        if simulate {
            rb.set_body_type(RigidBodyType::Dynamic, true);
        } else {
            rb.set_body_type(RigidBodyType::KinematicPositionBased, true);
            rb.set_linvel(Vector::zeros(), false);
            rb.set_angvel(Vector::zeros(), false);
        }
    }

    fn detach_preserving_world_transform(&mut self, body: RigidBodyHandle) {
        // Poses are stored in world space, so dropping the link is enough
        if let Some(anchor) = self.attachments.remove(&body) {
            debug!(?body, ?anchor, "Detached body");
        }
    }

    fn attach_to_snapped(&mut self, body: RigidBodyHandle, anchor: AnchorId) {
        let Some(target) = self.anchors.get(&anchor).copied() else {
            return;
        };
        let Some(rb) = self.bodies.get_mut(body) else {
            return;
        };

        let pose = to_isometry(&target);
        rb.set_position(pose, true);
        if rb.is_kinematic() {
            rb.set_next_kinematic_position(pose);
        }
        self.attachments.insert(body, anchor);
        debug!(?body, ?anchor, "Attached body");
    }

    fn apply_impulse(&mut self, body: RigidBodyHandle, impulse: Vec3) {
        let mode = self.config.impulse_mode;
        let Some(rb) = self.bodies.get_mut(body) else {
            return;
        };
        if !rb.is_dynamic() {
            return;
        }

        // rapier refreshes inverse mass lazily after a body type change, so the
        // velocity is written directly instead of going through apply_impulse
        let delta_v = match mode {
            ImpulseMode::VelocityChange => impulse,
            ImpulseMode::Momentum => {
                let mass = rb.mass();
                if mass <= 0.0 {
                    return;
                }
                impulse / mass
            }
        };
        let linvel = *rb.linvel() + to_vector(delta_v);
        rb.set_linvel(linvel, true);
    }
}
