//! Weapon tuning

use glam::Vec3;
use graviton_core::Transform;
use serde::{Deserialize, Serialize};

use super::FireFeedback;

/// Weapon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Maximum distance of the gravity gun trace
    pub trace_range: f32,
    /// Launch speed multiplier applied to the aim direction
    pub launch_strength: f32,
    /// Projectile spawn point relative to the view (forward is -Z)
    pub muzzle_offset: Vec3,
    /// Where grabbed objects are held relative to the view
    pub hold_offset: Transform,
    /// Sound and animation played when the weapon fires
    pub feedback: FireFeedback,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            trace_range: 5000.0,
            launch_strength: 5000.0,
            muzzle_offset: Vec3::new(0.2, -0.2, -1.0),
            hold_offset: Transform::from_position(Vec3::new(0.0, -0.3, -2.0)),
            feedback: FireFeedback::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_gravity_gun_tuning() {
        let config = WeaponConfig::default();
        assert_eq!(config.trace_range, 5000.0);
        assert_eq!(config.launch_strength, 5000.0);
        assert!(config.hold_offset.position.z < 0.0);
    }
}
