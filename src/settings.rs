//! Player preferences
//!
//! Plain data handed to and from the save collaborator; the core never
//! touches storage itself.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::{GameEvent, ScreenShake};
use crate::tuning::{Difficulty, Tuning};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Input ===
    /// Recognizer confidence below which gestures are ignored
    pub gesture_confidence: f32,
    /// Release as soon as the seals match, without waiting for release
    pub cast_on_match: bool,

    // === Visual Effects ===
    /// Screen shake on hits
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            gesture_confidence: 0.5,
            cast_on_match: false,

            screen_shake: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Shake to actually play for a hit
    pub fn shake_for(&self, shake: ScreenShake) -> ScreenShake {
        if self.effective_screen_shake() {
            shake
        } else {
            ScreenShake {
                amplitude: 0.0,
                duration: 0.0,
            }
        }
    }

    /// Rewrite presentation hints in an outgoing event
    pub fn adjust_event(&self, event: &mut GameEvent) {
        if let GameEvent::EnemyHit {
            shake_amplitude,
            shake_duration,
            ..
        } = event
        {
            let shake = self.shake_for(ScreenShake {
                amplitude: *shake_amplitude,
                duration: *shake_duration,
            });
            *shake_amplitude = shake.amplitude;
            *shake_duration = shake.duration;
        }
    }

    /// Balance for a new run under these preferences
    pub fn tuning(&self) -> Tuning {
        Tuning {
            min_gesture_confidence: self.gesture_confidence.clamp(0.0, 1.0),
            cast_on_match: self.cast_on_match,
            ..Tuning::for_difficulty(self.difficulty)
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse saved settings; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(amplitude: f32, duration: f32) -> GameEvent {
        GameEvent::EnemyHit {
            enemy_id: 1,
            jutsu_id: "fireball".to_string(),
            damage: 30,
            critical: false,
            combo: 1,
            score_gain: 110,
            shake_amplitude: amplitude,
            shake_duration: duration,
        }
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut settings = Settings::default();
        let shake = ScreenShake {
            amplitude: 0.3,
            duration: 0.4,
        };
        assert_eq!(settings.shake_for(shake), shake);

        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
        assert_eq!(settings.shake_for(shake).amplitude, 0.0);
    }

    #[test]
    fn test_adjust_event_strips_shake() {
        let settings = Settings {
            screen_shake: false,
            ..Default::default()
        };
        let mut event = hit(0.3, 0.4);
        settings.adjust_event(&mut event);
        assert!(matches!(
            event,
            GameEvent::EnemyHit { shake_amplitude, shake_duration, .. }
                if shake_amplitude == 0.0 && shake_duration == 0.0
        ));

        // Shake left alone when enabled
        let mut event = hit(0.3, 0.4);
        Settings::default().adjust_event(&mut event);
        assert_eq!(event, hit(0.3, 0.4));

        // Other events pass through
        let mut pause = GameEvent::Paused;
        settings.adjust_event(&mut pause);
        assert_eq!(pause, GameEvent::Paused);
    }

    #[test]
    fn test_tuning_follows_preferences() {
        let settings = Settings {
            difficulty: Difficulty::Hell,
            cast_on_match: true,
            gesture_confidence: 1.7,
            ..Default::default()
        };
        let tuning = settings.tuning();
        assert_eq!(tuning.difficulty, Difficulty::Hell);
        assert!(tuning.cast_on_match);
        assert_eq!(tuning.min_gesture_confidence, 1.0);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_json_partial() {
        let settings = Settings::from_json(r#"{ "reduced_motion": true, "difficulty": "Easy" }"#).unwrap();
        assert!(settings.reduced_motion);
        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.gesture_confidence, 0.5);

        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
