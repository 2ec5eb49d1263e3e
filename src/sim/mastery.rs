//! Jutsu mastery
//!
//! Casting a jutsu, finishing kills with it and clearing waves after using it
//! earn it experience. Levels 1-10 raise its damage and trim its chakra cost
//! and cooldown. Mastery belongs to the player, so it survives restarts.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::jutsu::Jutsu;
use crate::error::ConfigError;

pub const MAX_MASTERY_LEVEL: u32 = 10;

/// Experience for one cast, before the combo bonus
pub const EXP_PER_CAST: u32 = 10;
/// Extra cast experience per combo point, in percent of `EXP_PER_CAST`
pub const EXP_COMBO_PERCENT: u32 = 10;
pub const EXP_KILL_BONUS: u32 = 5;
pub const EXP_BOSS_KILL_BONUS: u32 = 50;
/// Granted to every jutsu used during a wave when the wave is cleared
pub const EXP_WAVE_CLEAR_BONUS: u32 = 20;

/// Thresholds and bonuses of one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasteryLevel {
    pub level: u32,
    /// Total experience needed to reach this level
    pub required_exp: u32,
    pub damage_percent: u32,
    /// Percent taken off the chakra cost
    pub cost_reduction: u32,
    /// Percent taken off the cooldown
    pub cooldown_reduction: u32,
}

const fn level(level: u32, required_exp: u32, damage_percent: u32, cost_reduction: u32, cooldown_reduction: u32) -> MasteryLevel {
    MasteryLevel {
        level,
        required_exp,
        damage_percent,
        cost_reduction,
        cooldown_reduction,
    }
}

pub const MASTERY_LEVELS: [MasteryLevel; MAX_MASTERY_LEVEL as usize] = [
    level(1, 0, 100, 0, 0),
    level(2, 100, 110, 0, 0),
    level(3, 300, 120, 5, 5),
    level(4, 600, 135, 5, 5),
    level(5, 1000, 150, 10, 10),
    level(6, 1500, 165, 10, 10),
    level(7, 2200, 180, 15, 15),
    level(8, 3000, 200, 15, 15),
    level(9, 4000, 220, 20, 20),
    level(10, 5500, 250, 25, 25),
];

/// Level table row, clamped to 1..=10
pub fn level_info(level: u32) -> &'static MasteryLevel {
    let index = level.clamp(1, MAX_MASTERY_LEVEL) as usize - 1;
    &MASTERY_LEVELS[index]
}

/// Experience for releasing a jutsu at `combo`
pub fn cast_experience(combo: u32) -> u32 {
    EXP_PER_CAST + EXP_PER_CAST * combo * EXP_COMBO_PERCENT / 100
}

/// Progress of one jutsu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JutsuMastery {
    pub level: u32,
    /// Total experience earned
    pub experience: u32,
}

impl Default for JutsuMastery {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
        }
    }
}

impl JutsuMastery {
    /// Fraction of the way to the next level (1.0 at max level)
    pub fn progress(&self) -> f32 {
        if self.level >= MAX_MASTERY_LEVEL {
            return 1.0;
        }
        let current = level_info(self.level).required_exp;
        let next = level_info(self.level + 1).required_exp;
        ((self.experience.saturating_sub(current)) as f32 / (next - current) as f32).min(1.0)
    }
}

/// Mastery of every jutsu the player has used
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mastery {
    jutsu: BTreeMap<String, JutsuMastery>,
}

impl Mastery {
    pub fn get(&self, jutsu_id: &str) -> JutsuMastery {
        self.jutsu.get(jutsu_id).copied().unwrap_or_default()
    }

    pub fn level(&self, jutsu_id: &str) -> u32 {
        self.get(jutsu_id).level
    }

    /// Add experience. Returns the new level when one or more levels were gained.
    pub fn add_experience(&mut self, jutsu_id: &str, amount: u32) -> Option<u32> {
        let entry = self.jutsu.entry(jutsu_id.to_string()).or_default();
        if entry.level >= MAX_MASTERY_LEVEL {
            return None;
        }

        let before = entry.level;
        entry.experience = entry.experience.saturating_add(amount);
        while entry.level < MAX_MASTERY_LEVEL && entry.experience >= level_info(entry.level + 1).required_exp {
            entry.level += 1;
        }
        (entry.level > before).then_some(entry.level)
    }

    /// The jutsu as the player casts it at their mastery level
    pub fn apply(&self, jutsu: &Arc<Jutsu>) -> Arc<Jutsu> {
        let info = level_info(self.level(&jutsu.id));
        if info.level == 1 {
            return Arc::clone(jutsu);
        }

        let mut upgraded = (**jutsu).clone();
        upgraded.damage = (jutsu.damage as u64 * info.damage_percent as u64 / 100) as u32;
        upgraded.chakra_cost = (jutsu.chakra_cost * (100 - info.cost_reduction) as f32 / 100.0).floor();
        let cooldown_ms = (jutsu.cooldown * 1000.0).round() as u32;
        upgraded.cooldown = (cooldown_ms * (100 - info.cooldown_reduction) / 100) as f32 / 1000.0;
        Arc::new(upgraded)
    }

    /// Sum of all jutsu levels
    pub fn total_level(&self) -> u32 {
        self.jutsu.values().map(|m| m.level).sum()
    }

    /// Number of jutsu at `level` or above
    pub fn count_at_level(&self, level: u32) -> usize {
        self.jutsu.values().filter(|m| m.level >= level).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &JutsuMastery)> {
        self.jutsu.iter().map(|(id, m)| (id.as_str(), m))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::jutsu::JutsuCatalog;

    #[test]
    fn test_cast_experience_scales_with_combo() {
        assert_eq!(cast_experience(0), 10);
        assert_eq!(cast_experience(5), 15);
        assert_eq!(cast_experience(25), 35);
    }

    #[test]
    fn test_level_thresholds() {
        let mut mastery = Mastery::default();
        assert_eq!(mastery.level("fireball"), 1);

        assert_eq!(mastery.add_experience("fireball", 99), None);
        assert_eq!(mastery.add_experience("fireball", 1), Some(2));
        // Several levels in one go
        assert_eq!(mastery.add_experience("fireball", 900), Some(5));
        assert_eq!(mastery.get("fireball").experience, 1000);
        assert_eq!(mastery.get("fireball").progress(), 0.0);

        assert_eq!(mastery.add_experience("fireball", 10_000), Some(MAX_MASTERY_LEVEL));
        assert_eq!(mastery.add_experience("fireball", 10), None);
        assert_eq!(mastery.get("fireball").progress(), 1.0);
        assert_eq!(mastery.total_level(), 10);
        assert_eq!(mastery.count_at_level(5), 1);
    }

    #[test]
    fn test_apply_scales_stats() {
        let catalog = JutsuCatalog::standard();
        let fireball = catalog.get("fireball").unwrap();
        let mut mastery = Mastery::default();

        // Level 1 shares the catalog entry
        assert!(Arc::ptr_eq(&mastery.apply(fireball), fireball));

        mastery.add_experience("fireball", 1000);
        let upgraded = mastery.apply(fireball);
        assert_eq!(upgraded.damage, 45);
        assert_eq!(upgraded.chakra_cost, 18.0);
        assert!((upgraded.cooldown - 0.9).abs() < 1e-6);
        assert_eq!(upgraded.seals, fireball.seals);
        assert_eq!(fireball.damage, 30);
    }

    #[test]
    fn test_level_info_clamps() {
        assert_eq!(level_info(0).level, 1);
        assert_eq!(level_info(42).level, MAX_MASTERY_LEVEL);
    }

    #[test]
    fn test_mastery_json() {
        let mut mastery = Mastery::default();
        mastery.add_experience("chidori_blade", 300);
        let json = mastery.to_json().unwrap();
        assert!(json.contains("chidori_blade"));
        assert_eq!(Mastery::from_json(&json).unwrap(), mastery);
    }
}
