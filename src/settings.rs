//! Game settings
//!
//! Settings are read from `~/.config/graviton/settings.toml` unless a path is
//! given on the command line. Missing fields fall back to their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use graviton_core::TimeConfig;
use graviton_game::PlayerConfig;
use graviton_physics::{PhysicsConfig, ProjectileConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub player: PlayerConfig,
    pub physics: PhysicsConfig,
    pub projectile: ProjectileConfig,
    pub time: TimeConfig,
}

impl GameSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("graviton"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from `path`, or from the default location when `None`
    ///
    /// Any problem is logged and answered with defaults.
    pub fn load_from(path: Option<&Path>) -> Self {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::settings_path() {
                Some(path) => path,
                None => {
                    warn!("Could not determine config directory");
                    return Self::default();
                }
            },
        };

        if !path.exists() {
            info!("No settings file found at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match Self::parse(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut settings: Self = toml::from_str(content)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Replace values the simulation cannot run with
    fn sanitize(&mut self) {
        let step = self.physics.timestep;
        if !(step.is_finite() && step > 0.0) {
            let fallback = PhysicsConfig::default().timestep;
            warn!("Physics timestep {} is not positive, using {}", step, fallback);
            self.physics.timestep = fallback;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graviton_game::WeaponMode;
    use graviton_physics::ImpulseMode;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = GameSettings::parse("").unwrap();
        assert_eq!(settings.player.weapon.trace_range, 5000.0);
        assert_eq!(settings.physics.impulse_mode, ImpulseMode::VelocityChange);
        assert_eq!(WeaponMode::default(), WeaponMode::Projectile);
    }

    #[test]
    fn test_partial_override() {
        let settings = GameSettings::parse(
            r#"
            [player.weapon]
            launch_strength = 1200.0

            [player.weapon.feedback]
            animation_rate = 2.0

            [physics]
            impulse_mode = "Momentum"
            "#,
        )
        .unwrap();

        assert_eq!(settings.player.weapon.launch_strength, 1200.0);
        assert_eq!(settings.player.weapon.trace_range, 5000.0);
        assert_eq!(settings.player.weapon.feedback.animation_rate, 2.0);
        assert!(settings.player.weapon.feedback.sound.is_some());
        assert_eq!(settings.physics.impulse_mode, ImpulseMode::Momentum);
        assert_eq!(settings.player.camera.base_turn_rate, 45.0);
    }

    #[test]
    fn test_settings_roundtrip_through_toml() {
        let settings = GameSettings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let back = GameSettings::parse(&text).unwrap();
        assert_eq!(back.projectile.lifespan, settings.projectile.lifespan);
        assert_eq!(back.player.weapon.hold_offset, settings.player.weapon.hold_offset);
    }

    #[test]
    fn test_non_positive_timestep_falls_back() {
        for text in ["[physics]\ntimestep = 0.0", "[physics]\ntimestep = -0.5", "[physics]\ntimestep = nan"] {
            let settings = GameSettings::parse(text).unwrap();
            assert_eq!(settings.physics.timestep, 1.0 / 60.0);
        }

        let settings = GameSettings::parse("[physics]\ntimestep = 0.01").unwrap();
        assert_eq!(settings.physics.timestep, 0.01);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = GameSettings::load_from(Some(Path::new("/nonexistent/graviton.toml")));
        assert_eq!(settings.player.weapon.launch_strength, 5000.0);
    }
}
