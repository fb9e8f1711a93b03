//! Frame timing for the host loop
//!
//! Tracks scaled delta time and hands out fixed physics steps from an accumulator.

use serde::{Deserialize, Serialize};

/// The `[time]` settings table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many in-game seconds pass per real second
    pub time_scale: f32,
    /// Seconds per physics step; the host copies the physics timestep here
    pub fixed_timestep: f32,
    /// Longest frame delta accepted before scaling
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 60.0,
            max_delta_time: 0.25,
        }
    }
}

/// Clock for the host loop
#[derive(Debug, Clone)]
pub struct GameTime {
    pub config: TimeConfig,
    /// Scaled seconds since start
    pub total_time: f64,
    /// Last frame's delta after clamping and scaling
    pub delta_time: f32,
    pub frame_count: u64,
    /// Scaled time not yet handed out as fixed steps
    fixed_accumulator: f32,
}

impl Default for GameTime {
    fn default() -> Self {
        Self::new(TimeConfig::default())
    }
}

impl GameTime {
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            total_time: 0.0,
            delta_time: 0.0,
            frame_count: 0,
            fixed_accumulator: 0.0,
        }
    }

    /// Advance by the raw wall-clock delta of the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.frame_count += 1;
        self.delta_time = raw_delta.min(self.config.max_delta_time) * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Drain the accumulator into whole fixed steps
    ///
    /// A non-positive timestep yields no steps.
    pub fn fixed_steps(&mut self) -> u32 {
        let step = self.config.fixed_timestep;
        if step <= 0.0 {
            return 0;
        }

        let mut steps = 0;
        while self.fixed_accumulator >= step {
            self.fixed_accumulator -= step;
            steps += 1;
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_time() {
        let mut time = GameTime::default();
        time.update(0.016);

        assert!(time.delta_time > 0.0);
        assert_eq!(time.frame_count, 1);
        assert!((time.total_time - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_time_scale_applies_to_delta() {
        let mut time = GameTime::new(TimeConfig {
            time_scale: 0.5,
            ..Default::default()
        });
        time.update(0.02);
        assert!((time.delta_time - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_fixed_steps_consume_accumulator() {
        let mut time = GameTime::new(TimeConfig {
            fixed_timestep: 0.01,
            ..Default::default()
        });

        time.update(0.035);
        assert_eq!(time.fixed_steps(), 3);
        assert_eq!(time.fixed_steps(), 0);
    }

    #[test]
    fn test_non_positive_timestep_yields_no_steps() {
        let mut time = GameTime::new(TimeConfig {
            fixed_timestep: 0.0,
            ..Default::default()
        });
        time.update(0.1);
        assert_eq!(time.fixed_steps(), 0);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut time = GameTime::default();
        time.update(5.0);
        assert_eq!(time.delta_time, time.config.max_delta_time);
    }
}
