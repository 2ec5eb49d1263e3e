//! Achievements
//!
//! Fixed threshold checks over lifetime stats and jutsu mastery. The caller
//! stores which ones are unlocked, like the high score table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::Mastery;
use crate::stats::PlayerStats;
use Requirement::*;

/// What has to be true for an achievement to unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    BestScore(u64),
    BestCombo(u32),
    BestWave(u32),
    TotalKills(u64),
    /// Lifetime kills of one enemy kind
    KindKills(&'static str, u64),
    /// Lifetime casts summed over the listed jutsu
    Casts(&'static [&'static str], u64),
    GamesPlayed(u32),
    /// Any jutsu at this mastery level
    MasteryLevel(u32),
}

impl Requirement {
    pub fn is_met(&self, stats: &PlayerStats, mastery: &Mastery) -> bool {
        match *self {
            Requirement::BestScore(n) => stats.best_score >= n,
            Requirement::BestCombo(n) => stats.best_combo >= n,
            Requirement::BestWave(n) => stats.best_wave >= n,
            Requirement::TotalKills(n) => stats.total_kills >= n,
            Requirement::KindKills(kind, n) => stats.kills_of(kind) >= n,
            Requirement::Casts(ids, n) => ids.iter().map(|id| stats.casts_of(id)).sum::<u64>() >= n,
            Requirement::GamesPlayed(n) => stats.games_played >= n,
            Requirement::MasteryLevel(level) => mastery.count_at_level(level) > 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub requirement: Requirement,
}

const fn achievement(id: &'static str, name: &'static str, description: &'static str, requirement: Requirement) -> Achievement {
    Achievement {
        id,
        name,
        description,
        requirement,
    }
}

const COMBO_JUTSU: &[&str] = &["fire_thunder_combo", "water_wind_combo", "earth_fire_combo", "thunder_water_combo"];

pub static ACHIEVEMENTS: &[Achievement] = &[
    // Score
    achievement("first_steps", "First Steps", "Score 500 points", BestScore(500)),
    achievement("rising_star", "Rising Star", "Score 2000 points", BestScore(2000)),
    achievement("legendary", "Legendary Ninja", "Score 5000 points", BestScore(5000)),
    achievement("impossible", "Beyond Limits", "Score 10000 points", BestScore(10_000)),
    // Combo
    achievement("combo_10", "Combo Novice", "Reach a 10 hit combo", BestCombo(10)),
    achievement("combo_25", "Combo Expert", "Reach a 25 hit combo", BestCombo(25)),
    achievement("combo_50", "Combo Master", "Reach a 50 hit combo", BestCombo(50)),
    achievement("combo_100", "Combo God", "Reach a 100 hit combo", BestCombo(100)),
    // Waves
    achievement("wave_5", "First Trial", "Reach wave 5", BestWave(5)),
    achievement("wave_10", "Pressing On", "Reach wave 10", BestWave(10)),
    achievement("wave_20", "Endless Challenge", "Reach wave 20", BestWave(20)),
    // Kills
    achievement("killer_50", "Hunter", "Defeat 50 enemies", TotalKills(50)),
    achievement("killer_200", "Reaper", "Defeat 200 enemies", TotalKills(200)),
    achievement("killer_500", "Warlord", "Defeat 500 enemies", TotalKills(500)),
    achievement("fast_hunter", "Gale Hunter", "Defeat 30 fast enemies", KindKills("fast", 30)),
    achievement("tank_buster", "Armor Breaker", "Defeat 20 tank enemies", KindKills("tank", 20)),
    // Jutsu
    achievement("fire_master", "Fire Style Master", "Cast the Great Fireball 50 times", Casts(&["fireball"], 50)),
    achievement("combo_jutsu", "Combination Master", "Cast two-element combos 10 times", Casts(COMBO_JUTSU, 10)),
    achievement("jutsu_adept", "Adept", "Raise a jutsu to mastery level 5", MasteryLevel(5)),
    achievement("jutsu_master", "Grandmaster", "Raise a jutsu to mastery level 10", MasteryLevel(10)),
    // Special
    achievement("persistent", "Never Give Up", "Play 10 games", GamesPlayed(10)),
];

/// Unlocked achievements with their unlock time (Unix ms)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Achievements {
    unlocked: BTreeMap<String, f64>,
}

impl Achievements {
    /// Unlock everything newly satisfied; returns what was unlocked, in table order
    pub fn check(&mut self, stats: &PlayerStats, mastery: &Mastery, timestamp: f64) -> Vec<&'static Achievement> {
        let mut fresh = Vec::new();
        for achievement in ACHIEVEMENTS {
            if self.is_unlocked(achievement.id) || !achievement.requirement.is_met(stats, mastery) {
                continue;
            }
            self.unlocked.insert(achievement.id.to_string(), timestamp);
            log::info!("Achievement unlocked: {}", achievement.name);
            fresh.push(achievement);
        }
        fresh
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains_key(id)
    }

    pub fn unlocked_at(&self, id: &str) -> Option<f64> {
        self.unlocked.get(id).copied()
    }

    /// (unlocked, total)
    pub fn progress(&self) -> (usize, usize) {
        let unlocked = ACHIEVEMENTS.iter().filter(|a| self.is_unlocked(a.id)).count();
        (unlocked, ACHIEVEMENTS.len())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
