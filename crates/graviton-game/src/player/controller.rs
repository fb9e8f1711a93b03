//! Player movement driven by the move axes

use glam::Vec3;
use graviton_physics::{CapsuleConfig, PhysicsWorld, PlayerCapsule};
use serde::{Deserialize, Serialize};

use crate::input::{InputAction, InputAxis, InputState};

/// How quickly planar speed changes, in m/s²
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traction {
    pub acceleration: f32,
    pub deceleration: f32,
}

/// Walking and jumping tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Top planar speed in m/s
    pub walk_speed: f32,
    pub ground: Traction,
    pub air: Traction,
    /// Upward speed given by a jump
    pub jump_velocity: f32,
    /// Downward acceleration while airborne, m/s²
    pub gravity: f32,
    /// Grace period after walking off a ledge during which a jump still works
    pub coyote_time: f32,
    /// How long a jump press is remembered before landing
    pub jump_buffer: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 6.0,
            ground: Traction {
                acceleration: 50.0,
                deceleration: 30.0,
            },
            air: Traction {
                acceleration: 10.0,
                deceleration: 5.0,
            },
            jump_velocity: 6.0,
            gravity: 9.81,
            coyote_time: 0.15,
            jump_buffer: 0.1,
        }
    }
}

impl MovementConfig {
    pub fn traction(&self, grounded: bool) -> Traction {
        if grounded {
            self.ground
        } else {
            self.air
        }
    }
}

/// Moves the player capsule from axis input
pub struct PlayerController {
    pub config: MovementConfig,
    pub capsule: PlayerCapsule,
    velocity: Vec3,
    /// Seconds since the capsule last stood on something
    airborne_for: f32,
    /// Remaining lifetime of a buffered jump press
    jump_request: Option<f32>,
}

impl PlayerController {
    pub fn new() -> Self {
        Self::with_config(MovementConfig::default(), CapsuleConfig::default())
    }

    pub fn with_config(config: MovementConfig, capsule: CapsuleConfig) -> Self {
        Self {
            config,
            capsule: PlayerCapsule::new(capsule),
            velocity: Vec3::ZERO,
            airborne_for: 0.0,
            jump_request: None,
        }
    }

    /// Place the capsule with its feet at `position`
    ///
    /// The capsule is hidden from raycasts and overlap tests so the weapon
    /// never targets its own holder.
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        let collider = self.capsule.spawn(physics, position);
        physics.exclude_from_queries(collider);
        self.velocity = Vec3::ZERO;
        self.airborne_for = 0.0;
        self.jump_request = None;
    }

    /// Position of the feet
    pub fn position(&self) -> Vec3 {
        self.capsule.feet()
    }

    pub fn eye_position(&self) -> Vec3 {
        self.capsule.eye_position()
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.capsule.is_grounded()
    }

    /// Grounded, or still inside the coyote window
    pub fn can_jump(&self) -> bool {
        self.is_grounded() || self.airborne_for < self.config.coyote_time
    }

    pub fn fixed_update(
        &mut self,
        physics: &mut PhysicsWorld,
        input: &InputState,
        camera_yaw: f32,
        dt: f32,
    ) {
        let grounded = self.capsule.is_grounded();
        self.airborne_for = if grounded { 0.0 } else { self.airborne_for + dt };

        if input.is_just_pressed(InputAction::Jump) {
            self.jump_request = Some(self.config.jump_buffer);
        }

        let wish = Self::move_direction(
            input.axis(InputAxis::MoveForward),
            input.axis(InputAxis::MoveRight),
            camera_yaw,
        ) * self.config.walk_speed;
        let traction = self.config.traction(grounded);
        let rate = if wish == Vec3::ZERO {
            traction.deceleration
        } else {
            traction.acceleration
        };
        let planar = Self::approach(
            Vec3::new(self.velocity.x, 0.0, self.velocity.z),
            wish,
            rate * dt,
        );

        let mut vertical = self.velocity.y;
        if let Some(left) = self.jump_request {
            if self.can_jump() {
                vertical = self.config.jump_velocity;
                self.jump_request = None;
                self.airborne_for = self.config.coyote_time;
            } else {
                self.jump_request = Some(left - dt).filter(|left| *left > 0.0);
            }
        }

        if !grounded {
            vertical -= self.config.gravity * dt;
        } else if vertical < 0.0 {
            vertical = 0.0;
        }

        self.velocity = Vec3::new(planar.x, vertical, planar.z);
        self.capsule.update(physics, self.velocity, dt);
    }

    /// World-space move direction for the forward/right axes, at most unit length
    fn move_direction(forward: f32, right: f32, yaw: f32) -> Vec3 {
        let local = Vec3::new(right, 0.0, -forward).clamp_length_max(1.0);
        if local.length_squared() == 0.0 {
            return Vec3::ZERO;
        }

        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        Vec3::new(
            local.x * cos_yaw - local.z * sin_yaw,
            0.0,
            local.x * sin_yaw + local.z * cos_yaw,
        )
    }

    /// Step `current` towards `target` by at most `max_delta`
    fn approach(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
        let gap = target - current;
        let distance = gap.length();
        if distance <= max_delta {
            target
        } else {
            current + gap / distance * max_delta
        }
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new()
    }
}
