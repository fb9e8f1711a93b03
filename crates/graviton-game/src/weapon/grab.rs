//! Gravity gun grab/launch state machine
//!
//! The controller owns a single slot. A successful grab freezes the target body
//! and pins it to the player's attachment target; release and launch hand it
//! back to the solver. Calls made in the wrong state change nothing.

use glam::Vec3;
use graviton_core::Transform;
use graviton_physics::{AimRay, AnchorId, PhysicsBodies};
use tracing::{debug, info};

use super::WeaponConfig;

/// Where a grabbed body is pinned, relative to the player's view
///
/// Owned by the player; the controller only reads it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachmentTarget {
    anchor: AnchorId,
    offset: Transform,
}

impl AttachmentTarget {
    pub fn new(anchor: AnchorId, offset: Transform) -> Self {
        Self { anchor, offset }
    }

    /// The physics-world anchor bodies are attached to
    pub fn anchor(&self) -> AnchorId {
        self.anchor
    }

    /// Offset from the player's view
    pub fn offset(&self) -> Transform {
        self.offset
    }

    /// World transform of the target for a given view transform
    pub fn world_transform(&self, view: &Transform) -> Transform {
        view.mul_transform(&self.offset)
    }
}

/// Why a grab found nothing to take
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NoTargetReason {
    #[error("the trace hit nothing in range")]
    Miss,
    #[error("the trace hit static geometry")]
    NotPhysicsBody,
    #[error("the body cannot be simulated")]
    SimulationUnsupported,
    #[error("the body is not simulating physics")]
    NotSimulating,
}

/// A grab that did not happen
///
/// Neither case is a failure of the game; callers log and move on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GrabError {
    #[error("no target: {0}")]
    NoTarget(#[from] NoTargetReason),
    #[error("already holding an object")]
    InvalidStateTransition,
}

/// Observable state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabState {
    Empty,
    Holding,
}

/// The single slot a held body lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrabbedObjectSlot<B> {
    occupant: Option<B>,
}

impl<B: Copy> GrabbedObjectSlot<B> {
    pub fn empty() -> Self {
        Self { occupant: None }
    }

    pub fn occupant(&self) -> Option<B> {
        self.occupant
    }

    pub fn state(&self) -> GrabState {
        match self.occupant {
            Some(_) => GrabState::Holding,
            None => GrabState::Empty,
        }
    }
}

impl<B: Copy> Default for GrabbedObjectSlot<B> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Grab/launch controller for one player
#[derive(Debug, Clone)]
pub struct GrabController<B> {
    /// Trace range for grabs
    pub trace_range: f32,
    /// Launch speed multiplier applied to the aim direction
    pub launch_strength: f32,
    slot: GrabbedObjectSlot<B>,
}

impl<B: Copy + Eq + std::fmt::Debug> GrabController<B> {
    /// Create an empty controller
    pub fn new(trace_range: f32, launch_strength: f32) -> Self {
        Self {
            trace_range,
            launch_strength,
            slot: GrabbedObjectSlot::empty(),
        }
    }

    /// Create an empty controller tuned by a weapon config
    pub fn from_config(config: &WeaponConfig) -> Self {
        Self::new(config.trace_range, config.launch_strength)
    }

    pub fn state(&self) -> GrabState {
        self.slot.state()
    }

    pub fn is_holding(&self) -> bool {
        self.state() == GrabState::Holding
    }

    /// The body currently held, if any
    pub fn grabbed(&self) -> Option<B> {
        self.slot.occupant()
    }

    /// Trace along `ray` and take the first simulating body within range
    pub fn try_grab<S>(
        &mut self,
        scene: &mut S,
        ray: &AimRay,
        target: &AttachmentTarget,
    ) -> Result<B, GrabError>
    where
        S: PhysicsBodies<Body = B>,
    {
        if self.is_holding() {
            return Err(GrabError::InvalidStateTransition);
        }

        let hit = scene
            .raycast(ray, self.trace_range)
            .ok_or(NoTargetReason::Miss)?;
        let body = hit.body.ok_or(NoTargetReason::NotPhysicsBody)?;
        if !scene.supports_simulation(body) {
            return Err(NoTargetReason::SimulationUnsupported.into());
        }
        if !scene.is_simulating_physics(body) {
            return Err(NoTargetReason::NotSimulating.into());
        }

        // Stop simulating before reparenting so the body is never pinned and
        // dynamic in the same tick
        scene.set_simulating_physics(body, false);
        scene.detach_preserving_world_transform(body);
        scene.attach_to_snapped(body, target.anchor());
        self.slot.occupant = Some(body);

        info!(?body, distance = hit.distance, "Grabbed object");
        Ok(body)
    }

    /// Drop the held body where it is, without pushing it
    pub fn release<S>(&mut self, scene: &mut S) -> bool
    where
        S: PhysicsBodies<Body = B>,
    {
        let Some(body) = self.slot.occupant.take() else {
            debug!("Release ignored, nothing held");
            return false;
        };

        scene.detach_preserving_world_transform(body);
        scene.set_simulating_physics(body, true);

        info!(?body, "Released object");
        true
    }

    /// Throw the held body along `aim_direction`
    pub fn launch<S>(&mut self, scene: &mut S, aim_direction: Vec3) -> bool
    where
        S: PhysicsBodies<Body = B>,
    {
        let Some(body) = self.slot.occupant.take() else {
            debug!("Launch ignored, nothing held");
            return false;
        };

        let launch_velocity = aim_direction * self.launch_strength;
        scene.detach_preserving_world_transform(body);
        scene.set_simulating_physics(body, true);
        scene.apply_impulse(body, launch_velocity);

        info!(?body, ?launch_velocity, "Launched object");
        true
    }
}
