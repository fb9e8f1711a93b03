//! Graviton Physics - Physics simulation using rapier3d
//!
//! Provides the simulated world, the body-control adapter used by the gravity
//! gun, projectiles, and the player's kinematic capsule.

mod body;
mod capsule;
mod projectile;
mod scene;

pub use body::{from_isometry, to_isometry};
pub use capsule::{CapsuleConfig, PlayerCapsule};
pub use projectile::{Projectile, ProjectileConfig, ProjectileHit, ProjectilePool};
pub use scene::{AimRay, AnchorId, PhysicsBodies, RayHit, WorldQuery};

pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use graviton_core::Transform;
use nalgebra::Unit;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

/// How an impulse handed to [`PhysicsBodies::apply_impulse`] is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImpulseMode {
    /// The vector is a change in velocity, independent of the body's mass
    #[default]
    VelocityChange,
    /// The vector is a change in momentum and is divided by the body's mass
    Momentum,
}

/// World tuning, read from the `[physics]` settings table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    /// Seconds simulated by one [`PhysicsWorld::step`]
    pub timestep: f32,
    /// Mass convention for impulses applied through the body adapter
    pub impulse_mode: ImpulseMode,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 60.0,
            impulse_mode: ImpulseMode::VelocityChange,
        }
    }
}

/// rapier's stepping machinery, kept apart from the body and collider storage
struct Solver {
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
}

impl Solver {
    fn new(timestep: f32) -> Self {
        let mut params = IntegrationParameters::default();
        params.dt = timestep;
        Self {
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
        }
    }

    fn step(&mut self, gravity: Vec3, bodies: &mut RigidBodySet, colliders: &mut ColliderSet) {
        self.pipeline.step(
            &vector![gravity.x, gravity.y, gravity.z],
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            bodies,
            colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );
    }

    fn remove(&mut self, handle: RigidBodyHandle, bodies: &mut RigidBodySet, colliders: &mut ColliderSet) {
        bodies.remove(
            handle,
            &mut self.islands,
            colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }
}

/// Bodies, colliders, anchors and the queries the weapon runs against them
pub struct PhysicsWorld {
    pub config: PhysicsConfig,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    solver: Solver,
    queries: QueryPipeline,
    /// Colliders that world queries never report (e.g. the player capsule)
    query_excluded: HashSet<ColliderHandle>,
    /// World transforms that attached bodies follow
    anchors: HashMap<AnchorId, Transform>,
    /// Which anchor each attached body is pinned to
    attachments: HashMap<RigidBodyHandle, AnchorId>,
    next_anchor: u32,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            solver: Solver::new(config.timestep),
            config,
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            queries: QueryPipeline::new(),
            query_excluded: HashSet::new(),
            anchors: HashMap::new(),
            attachments: HashMap::new(),
            next_anchor: 0,
        }
    }

    /// Move attached bodies onto their anchors, advance one timestep, then
    /// refresh queries so raycasts see the new poses
    pub fn step(&mut self) {
        self.sync_attachments();
        self.solver.step(self.config.gravity, &mut self.bodies, &mut self.colliders);
        self.refresh_queries();
    }

    /// Rebuild the query acceleration structure from current collider poses
    ///
    /// Called by [`PhysicsWorld::step`]; call it directly after inserting
    /// bodies when a raycast must see them before the next step.
    pub fn refresh_queries(&mut self) {
        self.queries.update(&self.colliders);
    }

    /// Drive every attached body towards its anchor for the coming step
    fn sync_attachments(&mut self) {
        for (handle, anchor) in &self.attachments {
            let Some(target) = self.anchors.get(anchor) else {
                continue;
            };
            let Some(body) = self.bodies.get_mut(*handle) else {
                continue;
            };

            let pose = to_isometry(target);
            if body.is_kinematic() {
                body.set_next_kinematic_position(pose);
            } else {
                body.set_position(pose, true);
            }
        }
    }

    /// Insert a parentless collider (ground, walls, the player capsule)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.colliders.insert(collider)
    }

    pub fn add_dynamic_body(&mut self, body: RigidBody, collider: Collider) -> (RigidBodyHandle, ColliderHandle) {
        let body = self.bodies.insert(body);
        let collider = self.colliders.insert_with_parent(collider, body, &mut self.bodies);
        (body, collider)
    }

    /// Spawn a dynamic box (a grabbable prop)
    pub fn spawn_dynamic_box(&mut self, half_extents: Vec3, position: Vec3) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .build();
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .friction(0.7)
            .density(1.0)
            .build();
        let (handle, _) = self.add_dynamic_body(body, collider);
        handle
    }

    /// Remove a body with its colliders, attachment and query exclusions
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.attachments.remove(&handle);
        if let Some(body) = self.bodies.get(handle) {
            for collider in body.colliders() {
                self.query_excluded.remove(collider);
            }
        }
        self.solver.remove(handle, &mut self.bodies, &mut self.colliders);
    }

    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    /// World-space pose of a rigid body
    pub fn body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.bodies.get(handle).map(|body| from_isometry(body.position()))
    }

    /// Linear velocity of a rigid body
    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|body| {
            let v = body.linvel();
            Vec3::new(v.x, v.y, v.z)
        })
    }

    /// Hide a collider from raycasts and overlap tests
    pub fn exclude_from_queries(&mut self, handle: ColliderHandle) {
        self.query_excluded.insert(handle);
    }

    /// Closest non-excluded collider along a ray
    ///
    /// `direction` is expected to be normalized; `distance` is then in world units.
    pub fn raycast_detailed(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );
        let not_excluded = |handle: ColliderHandle, _: &Collider| !self.query_excluded.contains(&handle);
        let filter = QueryFilter::default().predicate(&not_excluded);

        let (collider, intersection) = self.queries.cast_ray_and_get_normal(
            &self.bodies,
            &self.colliders,
            &ray,
            max_distance,
            true,
            filter,
        )?;
        let distance = intersection.time_of_impact;
        let n = intersection.normal;
        Some(RaycastHit {
            collider,
            body: self.colliders.get(collider).and_then(|c| c.parent()),
            distance,
            point: origin + direction * distance,
            normal: Vec3::new(n.x, n.y, n.z),
        })
    }

    /// Check whether a ball of `radius` at `position` would overlap any collider
    pub fn is_space_occupied(&self, position: Vec3, radius: f32) -> bool {
        let shape = Ball::new(radius);
        let pose = Isometry::translation(position.x, position.y, position.z);
        let not_excluded = |handle: ColliderHandle, _: &Collider| !self.query_excluded.contains(&handle);
        let filter = QueryFilter::default().predicate(&not_excluded);

        self.queries
            .intersection_with_shape(&self.bodies, &self.colliders, &pose, &shape, filter)
            .is_some()
    }

    /// Colliders currently in active contact with `handle`
    pub fn touching_colliders(&self, handle: ColliderHandle) -> Vec<ColliderHandle> {
        self.solver
            .narrow_phase
            .contact_pairs_with(handle)
            .filter(|pair| pair.has_any_active_contact)
            .map(|pair| {
                if pair.collider1 == handle {
                    pair.collider2
                } else {
                    pair.collider1
                }
            })
            .collect()
    }

    /// Create a named world transform that bodies can be attached to
    pub fn create_anchor(&mut self, transform: Transform) -> AnchorId {
        let id = AnchorId(self.next_anchor);
        self.next_anchor += 1;
        self.anchors.insert(id, transform);
        id
    }

    /// Move an anchor; attached bodies follow on the next step
    pub fn set_anchor_transform(&mut self, anchor: AnchorId, transform: Transform) {
        if let Some(slot) = self.anchors.get_mut(&anchor) {
            *slot = transform;
        }
    }

    /// Current world transform of an anchor
    pub fn anchor_transform(&self, anchor: AnchorId) -> Option<Transform> {
        self.anchors.get(&anchor).copied()
    }

    /// The anchor a body is currently attached to, if any
    pub fn attachment_of(&self, body: RigidBodyHandle) -> Option<AnchorId> {
        self.attachments.get(&body).copied()
    }

    /// Infinite floor facing +Y at height `y`
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let up = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        self.add_static_collider(
            ColliderBuilder::halfspace(up)
                .translation(vector![0.0, y, 0.0])
                .friction(0.7)
                .build(),
        )
    }

    /// Immovable box, used for walls and pillars
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .friction(0.7)
            .build();
        self.add_static_collider(collider)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// What [`PhysicsWorld::raycast_detailed`] found
#[derive(Debug, Clone)]
pub struct RaycastHit {
    pub collider: ColliderHandle,
    /// Owning rigid body, `None` for static geometry
    pub body: Option<RigidBodyHandle>,
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PhysicsBodies;

    #[test]
    fn test_default_world() {
        let world = PhysicsWorld::new();
        assert_eq!(world.config.gravity.y, -9.81);
        assert_eq!(world.config.impulse_mode, ImpulseMode::VelocityChange);
        assert_eq!(world.bodies.len(), 0);
    }

    #[test]
    fn test_dropped_box_settles_on_ground() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        let body = world.spawn_dynamic_box(Vec3::splat(0.5), Vec3::new(0.0, 3.0, 0.0));
        for _ in 0..180 {
            world.step();
        }
        let rest = world.body_transform(body).unwrap().position;
        assert!((rest.y - 0.5).abs() < 0.05);
    }

    #[test]
    fn test_removed_body_forgets_attachment() {
        let mut world = PhysicsWorld::new();
        let body = world.spawn_dynamic_box(Vec3::splat(0.5), Vec3::ZERO);
        let anchor = world.create_anchor(Transform::default());
        world.attach_to_snapped(body, anchor);
        assert_eq!(world.attachment_of(body), Some(anchor));

        world.remove_rigid_body(body);
        assert!(world.get_rigid_body(body).is_none());
        assert_eq!(world.attachment_of(body), None);
        assert_eq!(world.colliders.len(), 0);
    }

    #[test]
    fn test_raycast_reports_body_and_point() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        let crate_body = world.spawn_dynamic_box(Vec3::splat(0.5), Vec3::new(0.0, 0.5, -10.0));
        world.refresh_queries();

        let hit = world
            .raycast_detailed(Vec3::new(0.0, 0.5, 0.0), Vec3::NEG_Z, 100.0)
            .expect("ray should hit the crate");
        assert_eq!(hit.body, Some(crate_body));
        assert!((hit.distance - 9.5).abs() < 1e-3);
        assert!((hit.point.z + 9.5).abs() < 1e-3);

        let ground_hit = world
            .raycast_detailed(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, 100.0)
            .expect("ray should hit the ground");
        assert_eq!(ground_hit.body, None);
    }

    #[test]
    fn test_raycast_respects_max_distance() {
        let mut world = PhysicsWorld::new();
        world.spawn_dynamic_box(Vec3::splat(0.5), Vec3::new(0.0, 0.0, -10.0));
        world.refresh_queries();

        assert!(world.raycast_detailed(Vec3::ZERO, Vec3::NEG_Z, 5.0).is_none());
        assert!(world.raycast_detailed(Vec3::ZERO, Vec3::NEG_Z, 50.0).is_some());
    }

    #[test]
    fn test_excluded_collider_is_invisible_to_queries() {
        let mut world = PhysicsWorld::new();
        let wall = world.create_static_box(Vec3::splat(1.0), Vec3::new(0.0, 0.0, -5.0));
        world.refresh_queries();
        assert!(world.raycast_detailed(Vec3::ZERO, Vec3::NEG_Z, 100.0).is_some());
        assert!(world.is_space_occupied(Vec3::new(0.0, 0.0, -5.0), 0.1));

        world.exclude_from_queries(wall);
        assert!(world.raycast_detailed(Vec3::ZERO, Vec3::NEG_Z, 100.0).is_none());
        assert!(!world.is_space_occupied(Vec3::new(0.0, 0.0, -5.0), 0.1));
    }

    #[test]
    fn test_anchor_roundtrip() {
        let mut world = PhysicsWorld::new();
        let anchor = world.create_anchor(Transform::default());
        let moved = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));

        world.set_anchor_transform(anchor, moved);
        assert_eq!(world.anchor_transform(anchor), Some(moved));
        assert_eq!(world.anchor_transform(AnchorId(99)), None);
    }
}
