//! Data-driven game balance
//!
//! Every number the simulation balances around lives here so a JSON file can
//! override it. Geometry that the renderer also depends on stays in `consts`.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::jutsu::MAX_JUTSU_SEALS;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Nightmare,
    Hell,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Nightmare => "Nightmare",
            Difficulty::Hell => "Hell",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "nightmare" => Some(Difficulty::Nightmare),
            "hell" => Some(Difficulty::Hell),
            _ => None,
        }
    }

    /// Multiplier on spawned enemy health
    pub fn enemy_health_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.7,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
            Difficulty::Nightmare => 2.0,
            Difficulty::Hell => 3.0,
        }
    }

    /// Multiplier on chakra regeneration
    pub fn chakra_regen_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.5,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.8,
            Difficulty::Nightmare => 0.5,
            Difficulty::Hell => 0.3,
        }
    }
}

/// Balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub difficulty: Difficulty,

    // === Input ===
    /// Seal buffer capacity
    pub max_seals: usize,
    /// Gesture frames below this confidence never become seals
    pub min_gesture_confidence: f32,
    /// Try to match after every accepted seal instead of waiting for release
    pub cast_on_match: bool,
    /// Try to match as soon as the seal buffer fills up
    pub auto_release_when_full: bool,

    // === Chakra ===
    pub starting_chakra: f32,
    pub max_chakra: f32,
    /// Regen per second before bonuses
    pub regen_base: f32,
    /// Regen bonus per wave number
    pub regen_per_wave: f32,
    /// Regen bonus per combo count
    pub regen_per_combo: f32,

    // === Combo & score ===
    /// Seconds a combo survives without a hit
    pub combo_window: f32,
    pub base_hit_score: u64,
    /// Per-wave score bonus in percent (10 = +10% per wave)
    pub wave_bonus_percent: u64,
    /// One-time bonuses for reaching an exact combo count
    pub combo_milestones: Vec<(u32, u64)>,
    /// Damage multiplier on a critical hit, in percent
    pub crit_multiplier_percent: u32,

    // === Waves ===
    /// Kills needed to advance (capped by the wave's enemy count)
    pub kills_per_wave: u32,
    /// Concurrent enemy cap for the spawner
    pub max_enemies: usize,
    /// A boss enters on every wave divisible by this
    pub boss_wave_interval: u32,
    pub boss_summon_count: u32,
    /// Shield granted by a boss shield skill, percent of max health
    pub boss_shield_percent: u32,

    pub starting_lives: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            max_seals: 3,
            min_gesture_confidence: 0.5,
            cast_on_match: false,
            auto_release_when_full: true,

            starting_chakra: 100.0,
            max_chakra: 100.0,
            regen_base: 5.0,
            regen_per_wave: 2.0,
            regen_per_combo: 0.5,

            combo_window: 3.0,
            base_hit_score: 100,
            wave_bonus_percent: 10,
            combo_milestones: vec![(10, 500), (25, 1500), (50, 5000)],
            crit_multiplier_percent: 200,

            kills_per_wave: 5,
            max_enemies: 10,
            boss_wave_interval: 5,
            boss_summon_count: 3,
            boss_shield_percent: 20,

            starting_lives: 3,
        }
    }
}

impl Tuning {
    /// Default balance with a difficulty preset applied
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Parse and validate a (possibly partial) tuning file
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: String| Err(ConfigError::InvalidTuning(msg));

        if self.max_seals == 0 || self.max_seals > MAX_JUTSU_SEALS {
            return fail(format!(
                "max_seals must be 1..={}, got {}",
                MAX_JUTSU_SEALS, self.max_seals
            ));
        }
        if !(0.0..=1.0).contains(&self.min_gesture_confidence) {
            return fail(format!(
                "min_gesture_confidence must be within 0..=1, got {}",
                self.min_gesture_confidence
            ));
        }
        if self.max_chakra <= 0.0 {
            return fail(format!("max_chakra must be positive, got {}", self.max_chakra));
        }
        if self.starting_chakra < 0.0 || self.starting_chakra > self.max_chakra {
            return fail(format!(
                "starting_chakra {} outside 0..={}",
                self.starting_chakra, self.max_chakra
            ));
        }
        if self.combo_window <= 0.0 {
            return fail(format!("combo_window must be positive, got {}", self.combo_window));
        }
        if self.kills_per_wave == 0 {
            return fail("kills_per_wave must be at least 1".to_string());
        }
        if self.max_enemies == 0 {
            return fail("max_enemies must be at least 1".to_string());
        }
        if self.boss_wave_interval == 0 {
            return fail("boss_wave_interval must be at least 1".to_string());
        }
        if self.starting_lives == 0 {
            return fail("starting_lives must be at least 1".to_string());
        }
        Ok(())
    }

    /// Chakra regenerated per second at this wave and combo
    pub fn regen_rate(&self, wave: u32, combo: u32) -> f32 {
        (self.regen_base + wave as f32 * self.regen_per_wave + combo as f32 * self.regen_per_combo)
            * self.difficulty.chakra_regen_scale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_seals": 4, "difficulty": "Hard" }"#).unwrap();
        assert_eq!(tuning.max_seals, 4);
        assert_eq!(tuning.difficulty, Difficulty::Hard);
        assert_eq!(tuning.base_hit_score, 100);
        assert_eq!(tuning.combo_milestones, vec![(10, 500), (25, 1500), (50, 5000)]);
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = Tuning::from_json(r#"{ "max_seals": 9 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTuning(_)));

        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_regen_wave_outweighs_combo() {
        let tuning = Tuning::default();
        let base = tuning.regen_rate(1, 0);
        let next_wave = tuning.regen_rate(2, 0);
        let next_combo = tuning.regen_rate(1, 1);
        assert!(next_wave - base > next_combo - base);
        assert!(next_combo > base);
    }

    #[test]
    fn test_regen_scaled_by_difficulty() {
        // (5 + 1 * 2) at wave 1 without combo
        let hard = Tuning::for_difficulty(Difficulty::Hard).regen_rate(1, 0);
        assert!((hard - 5.6).abs() < 1e-5);

        let hell = Tuning::for_difficulty(Difficulty::Hell).regen_rate(1, 0);
        assert!((hell - 2.1).abs() < 1e-5);

        let easy = Tuning::for_difficulty(Difficulty::Easy).regen_rate(2, 4);
        assert!((easy - 16.5).abs() < 1e-5);
    }

    #[test]
    fn test_difficulty_round_trip_names() {
        for d in [
            Difficulty::Easy,
            Difficulty::Normal,
            Difficulty::Hard,
            Difficulty::Nightmare,
            Difficulty::Hell,
        ] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("impossible"), None);
    }
}
