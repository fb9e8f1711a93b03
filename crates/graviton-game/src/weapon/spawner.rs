//! Projectile launcher seam

use glam::{Quat, Vec3};
use graviton_physics::{PhysicsWorld, ProjectilePool, RigidBodyHandle, WorldQuery};

/// Something that can put a projectile into the world
pub trait ProjectileSpawner<S: WorldQuery> {
    /// Spawn at `location` flying along `rotation`; `None` if spawning was refused
    fn spawn(&mut self, scene: &mut S, location: Vec3, rotation: Quat) -> Option<S::Body>;
}

impl ProjectileSpawner<PhysicsWorld> for ProjectilePool {
    fn spawn(
        &mut self,
        scene: &mut PhysicsWorld,
        location: Vec3,
        rotation: Quat,
    ) -> Option<RigidBodyHandle> {
        ProjectilePool::spawn(self, scene, location, rotation)
    }
}
