//! First-person camera controller
//!
//! Yaw grows to the right and pitch grows upwards. Mouse and direct axis input
//! are in degrees; rate axes are scaled by the configured base rates and the
//! frame time.

use glam::{EulerRot, Quat, Vec3};
use graviton_core::Transform;
use graviton_physics::AimRay;

use crate::input::{InputAxis, InputState};

use super::CameraConfig;

/// Camera locked to the character's eyes
#[derive(Debug, Clone)]
pub struct FirstPersonCamera {
    pub config: CameraConfig,
    /// Radians, positive turns right
    pub yaw: f32,
    /// Radians, positive looks up
    pub pitch: f32,
    /// Eye position plus the configured offset
    position: Vec3,
}

impl FirstPersonCamera {
    pub fn new() -> Self {
        Self::with_config(CameraConfig::default())
    }

    pub fn with_config(config: CameraConfig) -> Self {
        Self {
            config,
            yaw: 0.0,
            pitch: 0.0,
            position: Vec3::ZERO,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit view direction; yaw 0 and pitch 0 look down -Z
    pub fn forward(&self) -> Vec3 {
        let cos_pitch = self.pitch.cos();
        Vec3::new(
            self.yaw.sin() * cos_pitch,
            self.pitch.sin(),
            -self.yaw.cos() * cos_pitch,
        )
    }

    /// Horizontal unit vector to the right of the view
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    /// Orientation whose -Z axis is [`Self::forward`]
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, -self.yaw, self.pitch, 0.0)
    }

    /// World transform of the view
    pub fn view_transform(&self) -> Transform {
        Transform::from_position_rotation(self.position, self.rotation())
    }

    /// Ray from the eyes along the view direction
    pub fn aim_ray(&self) -> AimRay {
        AimRay::new(self.position, self.forward())
    }

    /// Turn right by `degrees`
    pub fn add_yaw(&mut self, degrees: f32) {
        self.yaw += degrees.to_radians();
    }

    /// Look up by `degrees`, clamped to the configured range
    pub fn add_pitch(&mut self, degrees: f32) {
        self.set_pitch(self.pitch + degrees.to_radians());
    }

    /// Turn at a normalized rate for `dt` seconds
    pub fn turn_at_rate(&mut self, rate: f32, dt: f32) {
        self.add_yaw(rate * self.config.base_turn_rate * dt);
    }

    /// Look up at a normalized rate for `dt` seconds
    pub fn look_up_at_rate(&mut self, rate: f32, dt: f32) {
        self.add_pitch(rate * self.config.base_look_up_rate * dt);
    }

    /// Set pitch in radians, clamped to the configured range
    pub fn set_pitch(&mut self, pitch: f32) {
        let pitch_min = self.config.pitch_min.to_radians();
        let pitch_max = self.config.pitch_max.to_radians();
        self.pitch = pitch.clamp(pitch_min, pitch_max);
    }

    /// Apply look input and follow the character's eyes
    pub fn update(&mut self, input: &InputState, eye_position: Vec3, dt: f32) {
        // Mouse moving up (negative y) looks up
        if input.cursor_captured {
            self.add_yaw(input.mouse_delta.x);
            self.add_pitch(-input.mouse_delta.y);
        }

        self.add_yaw(input.axis(InputAxis::Turn));
        self.add_pitch(input.axis(InputAxis::LookUp));
        self.turn_at_rate(input.axis(InputAxis::TurnRate), dt);
        self.look_up_at_rate(input.axis(InputAxis::LookUpRate), dt);

        self.follow(eye_position);
    }

    /// Move the camera to the character's eyes without applying input
    pub fn follow(&mut self, eye_position: Vec3) {
        self.position = eye_position + Vec3::Y * self.config.eye_height_offset;
    }
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self::new()
    }
}
