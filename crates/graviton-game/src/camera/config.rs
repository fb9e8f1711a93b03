//! The `[player.camera]` settings table

use serde::{Deserialize, Serialize};

/// Look rates and pitch limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Yaw speed in degrees per second at full stick deflection
    pub base_turn_rate: f32,
    /// Pitch speed in degrees per second at full stick deflection
    pub base_look_up_rate: f32,
    /// Pitch clamp in degrees, looking down
    pub pitch_min: f32,
    /// Pitch clamp in degrees, looking up
    pub pitch_max: f32,
    /// Raises the camera above the capsule's eye point
    pub eye_height_offset: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            base_turn_rate: 45.0,
            base_look_up_rate: 45.0,
            pitch_min: -89.0,
            pitch_max: 89.0,
            eye_height_offset: 0.0,
        }
    }
}
