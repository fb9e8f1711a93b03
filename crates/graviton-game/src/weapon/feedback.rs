//! Fire sound and animation hooks
//!
//! Audio and animation playback live outside the weapon. The weapon only says
//! which cue to play; anything left unset is skipped.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Cues played when the weapon fires or launches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FireFeedback {
    /// Sound played at the player's location
    pub sound: Option<String>,
    /// Arms animation montage
    pub animation: Option<String>,
    /// Playback rate of the animation
    pub animation_rate: f32,
}

impl Default for FireFeedback {
    fn default() -> Self {
        Self {
            sound: Some("sfx/weapon_fire.ogg".to_string()),
            animation: Some("fire".to_string()),
            animation_rate: 1.0,
        }
    }
}

impl FireFeedback {
    /// Play whichever cues are configured
    pub fn trigger(&self, sink: &mut dyn FeedbackSink, location: Vec3) {
        if let Some(sound) = &self.sound {
            sink.play_sound_at(sound, location);
        }
        if let Some(animation) = &self.animation {
            sink.play_animation(animation, self.animation_rate);
        }
    }
}

/// Receiver for feedback cues (audio engine, animation graph, ...)
pub trait FeedbackSink {
    fn play_sound_at(&mut self, sound: &str, location: Vec3);
    fn play_animation(&mut self, animation: &str, rate: f32);
}

/// Feedback sink that only logs and counts cues
#[derive(Debug, Default)]
pub struct LogFeedback {
    pub sounds_played: usize,
    pub animations_played: usize,
}

impl FeedbackSink for LogFeedback {
    fn play_sound_at(&mut self, sound: &str, location: Vec3) {
        self.sounds_played += 1;
        info!(sound, ?location, "Playing sound");
    }

    fn play_animation(&mut self, animation: &str, rate: f32) {
        self.animations_played += 1;
        info!(animation, rate, "Playing animation");
    }
}
