//! Run summaries and lifetime player statistics
//!
//! Plain serde data exchanged with the save collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::GameState;
use crate::tuning::Difficulty;

/// Snapshot of one run, taken at game over (or any time for display)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u64,
    pub wave: u32,
    pub max_combo: u32,
    pub kills: u32,
    pub boss_kills: u32,
    pub casts: u32,
    pub damage_dealt: u64,
    pub lives_lost: u32,
    /// Seconds of unpaused play
    pub elapsed: f32,
    pub difficulty: Difficulty,
    pub jutsu_used: BTreeMap<String, u32>,
    /// Kills per enemy kind
    pub enemy_kills: BTreeMap<String, u32>,
}

impl SessionSummary {
    pub fn from_state(state: &GameState, difficulty: Difficulty) -> Self {
        let stats = &state.stats;
        Self {
            score: state.score,
            wave: state.wave,
            max_combo: stats.max_combo,
            kills: stats.kills,
            boss_kills: stats.boss_kills,
            casts: stats.casts,
            damage_dealt: stats.damage_dealt,
            lives_lost: stats.lives_lost,
            elapsed: state.elapsed,
            difficulty,
            jutsu_used: stats.jutsu_used.clone(),
            enemy_kills: stats.enemy_kills.clone(),
        }
    }

    /// Most cast jutsu; ties go to the first id alphabetically
    pub fn favorite_jutsu(&self) -> Option<&str> {
        favorite(&self.jutsu_used)
    }
}

/// Totals across every recorded run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub games_played: u32,
    pub total_score: u64,
    pub best_score: u64,
    pub best_wave: u32,
    pub best_combo: u32,
    pub total_kills: u64,
    pub total_boss_kills: u32,
    pub total_casts: u64,
    /// Seconds
    pub total_play_time: f64,
    pub jutsu_used: BTreeMap<String, u64>,
    pub enemy_kills: BTreeMap<String, u64>,
}

impl PlayerStats {
    /// Fold a finished run into the totals
    pub fn record(&mut self, run: &SessionSummary) {
        self.games_played += 1;
        self.total_score = self.total_score.saturating_add(run.score);
        self.best_score = self.best_score.max(run.score);
        self.best_wave = self.best_wave.max(run.wave);
        self.best_combo = self.best_combo.max(run.max_combo);
        self.total_kills += u64::from(run.kills);
        self.total_boss_kills += run.boss_kills;
        self.total_casts += u64::from(run.casts);
        self.total_play_time += f64::from(run.elapsed);
        for (id, count) in &run.jutsu_used {
            *self.jutsu_used.entry(id.clone()).or_default() += u64::from(*count);
        }
        for (kind, count) in &run.enemy_kills {
            *self.enemy_kills.entry(kind.clone()).or_default() += u64::from(*count);
        }
    }

    pub fn average_score(&self) -> u64 {
        if self.games_played == 0 {
            0
        } else {
            self.total_score / u64::from(self.games_played)
        }
    }

    pub fn favorite_jutsu(&self) -> Option<&str> {
        favorite(&self.jutsu_used)
    }

    /// Lifetime casts of `jutsu_id`
    pub fn casts_of(&self, jutsu_id: &str) -> u64 {
        self.jutsu_used.get(jutsu_id).copied().unwrap_or(0)
    }

    /// Lifetime kills of one enemy kind
    pub fn kills_of(&self, kind: &str) -> u64 {
        self.enemy_kills.get(kind).copied().unwrap_or(0)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn favorite<N: Ord + Copy>(counts: &BTreeMap<String, N>) -> Option<&str> {
    // max_by_key keeps the last maximum, so walk in reverse
    counts
        .iter()
        .rev()
        .max_by_key(|(_, n)| **n)
        .map(|(id, _)| id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn summary(score: u64, wave: u32, combo: u32) -> SessionSummary {
        SessionSummary {
            score,
            wave,
            max_combo: combo,
            kills: 4,
            casts: 6,
            elapsed: 30.0,
            jutsu_used: BTreeMap::from([("fireball".to_string(), 4), ("chidori".to_string(), 2)]),
            enemy_kills: BTreeMap::from([("basic".to_string(), 3), ("tank".to_string(), 1)]),
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_from_state() {
        let mut state = GameState::new(5, &Tuning::default());
        state.score = 1210;
        state.wave = 3;
        state.stats.kills = 7;
        state.stats.max_combo = 11;
        state.stats.jutsu_used.insert("fireball".to_string(), 3);
        state.stats.enemy_kills.insert("fast".to_string(), 2);

        let run = SessionSummary::from_state(&state, Difficulty::Hard);
        assert_eq!(run.score, 1210);
        assert_eq!(run.wave, 3);
        assert_eq!(run.kills, 7);
        assert_eq!(run.max_combo, 11);
        assert_eq!(run.difficulty, Difficulty::Hard);
        assert_eq!(run.favorite_jutsu(), Some("fireball"));
        assert_eq!(run.enemy_kills.get("fast"), Some(&2));
    }

    #[test]
    fn test_record_keeps_bests_and_totals() {
        let mut stats = PlayerStats::default();
        stats.record(&summary(1000, 4, 12));
        stats.record(&summary(400, 6, 3));

        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.best_score, 1000);
        assert_eq!(stats.best_wave, 6);
        assert_eq!(stats.best_combo, 12);
        assert_eq!(stats.total_kills, 8);
        assert_eq!(stats.average_score(), 700);
        assert_eq!(stats.jutsu_used.get("fireball"), Some(&8));
        assert_eq!(stats.favorite_jutsu(), Some("fireball"));
        assert_eq!(stats.kills_of("basic"), 6);
        assert_eq!(stats.kills_of("tank"), 2);
        assert_eq!(stats.kills_of("boss"), 0);
        assert_eq!(stats.casts_of("chidori"), 4);
    }

    #[test]
    fn test_favorite_tie_is_alphabetical() {
        let run = SessionSummary {
            jutsu_used: BTreeMap::from([("water_wall".to_string(), 2), ("chidori".to_string(), 2)]),
            ..Default::default()
        };
        assert_eq!(run.favorite_jutsu(), Some("chidori"));
        assert_eq!(SessionSummary::default().favorite_jutsu(), None);
    }

    #[test]
    fn test_empty_stats() {
        let stats = PlayerStats::default();
        assert_eq!(stats.average_score(), 0);

        let loaded = PlayerStats::from_json("{}").unwrap();
        assert_eq!(loaded, stats);
        assert!(PlayerStats::from_json("{ nope").is_err());
        assert!(PlayerStats::from_json(r#"{ "games_played": "many" }"#).is_err());
    }
}
