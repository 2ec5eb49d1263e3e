//! Game state and live-entity types
//!
//! Everything a run needs to continue deterministically lives here,
//! including the seeded RNG.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::buffs::Buffs;
use super::enemy::Enemy;
use super::jutsu::{Chakra, Jutsu};
use super::mastery::Mastery;
use super::score::Combo;
use super::seals::SealSequence;
use super::spawner::EnemySpawner;
use crate::consts::JUTSU_LIFETIME;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    Paused,
    /// Run ended; nothing moves until restart
    GameOver,
}

/// A released jutsu in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JutsuInstance {
    pub id: u32,
    pub jutsu: Arc<Jutsu>,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Seconds left
    pub lifetime: f32,
    pub active: bool,
    /// Enemy the instance steers toward, if it locked on at release
    #[serde(default)]
    pub target: Option<u32>,
}

impl JutsuInstance {
    pub fn new(id: u32, jutsu: Arc<Jutsu>, position: Vec3, velocity: Vec3) -> Self {
        Self {
            id,
            jutsu,
            position,
            velocity,
            lifetime: JUTSU_LIFETIME,
            active: true,
            target: None,
        }
    }

    /// Move and age; deactivates when the lifetime runs out
    pub fn advance(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.position += self.velocity * dt;
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            self.lifetime = 0.0;
            self.active = false;
        }
    }

    /// Turn toward `point`, keeping speed
    pub fn steer_toward(&mut self, point: Vec3) {
        let speed = self.velocity.length();
        let dir = (point - self.position).normalize_or_zero();
        if dir != Vec3::ZERO {
            self.velocity = dir * speed;
        }
    }
}

/// Running totals for the current run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub kills: u32,
    pub boss_kills: u32,
    pub max_combo: u32,
    pub casts: u32,
    pub damage_dealt: u64,
    pub lives_lost: u32,
    /// Casts per jutsu id
    pub jutsu_used: BTreeMap<String, u32>,
    /// Kills per enemy kind (`EnemyKind::as_str`)
    #[serde(default)]
    pub enemy_kills: BTreeMap<String, u32>,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub chakra: Chakra,
    pub score: u64,
    pub combo: Combo,
    pub seals: SealSequence,
    /// Live enemies, in spawn order
    pub enemies: Vec<Enemy>,
    /// Live jutsu, in release order
    pub jutsu_instances: Vec<JutsuInstance>,
    pub phase: GamePhase,
    /// Current wave (1-based)
    pub wave: u32,
    pub lives: u8,
    pub kills_this_wave: u32,
    pub spawner: EnemySpawner,
    pub buffs: Buffs,
    /// Seconds left per jutsu id
    pub cooldowns: BTreeMap<String, f32>,
    pub stats: SessionStats,
    /// Seconds of unpaused play
    pub elapsed: f32,
    /// Player's jutsu mastery, carried across restarts
    #[serde(default)]
    pub mastery: Mastery,
    /// Jutsu released during the current wave
    #[serde(default)]
    pub wave_jutsu: BTreeSet<String>,
    next_id: u32,
}

impl GameState {
    /// Fresh run: full chakra, no score, wave 1
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            chakra: Chakra {
                current: tuning.starting_chakra,
                max: tuning.max_chakra,
            },
            score: 0,
            combo: Combo::default(),
            seals: SealSequence::new(tuning.max_seals),
            enemies: Vec::new(),
            jutsu_instances: Vec::new(),
            phase: GamePhase::Playing,
            wave: 1,
            lives: tuning.starting_lives,
            kills_this_wave: 0,
            spawner: EnemySpawner::new(1, tuning.max_enemies)
                .with_health_scale(tuning.difficulty.enemy_health_scale()),
            buffs: Buffs::default(),
            cooldowns: BTreeMap::new(),
            stats: SessionStats::default(),
            elapsed: 0.0,
            mastery: Mastery::default(),
            wave_jutsu: BTreeSet::new(),
            next_id: 1,
        }
    }

    /// Start with previously earned mastery
    pub fn with_mastery(mut self, mastery: Mastery) -> Self {
        self.mastery = mastery;
        self
    }

    /// Back to the documented defaults, same seed. Mastery is kept.
    pub fn restart(&mut self, tuning: &Tuning) {
        self.teardown();
        let mastery = std::mem::take(&mut self.mastery);
        *self = Self::new(self.seed, tuning).with_mastery(mastery);
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Allocate `count` consecutive IDs, returning the first
    pub fn reserve_ids(&mut self, count: u32) -> u32 {
        let first = self.next_id;
        self.next_id += count;
        first
    }

    /// Seconds before `jutsu_id` can be released again
    pub fn cooldown_remaining(&self, jutsu_id: &str) -> f32 {
        self.cooldowns.get(jutsu_id).copied().unwrap_or(0.0)
    }

    /// Stop every running clock and ground every projectile
    pub fn teardown(&mut self) {
        self.spawner.reset();
        self.combo.reset();
        self.cooldowns.clear();
        self.buffs.clear();
        for enemy in &mut self.enemies {
            if let Some(boss) = enemy.boss.as_mut() {
                boss.reset_cooldowns();
            }
            if let Some(summon) = enemy.summon.as_mut() {
                summon.timer = 0.0;
            }
        }
        for instance in &mut self.jutsu_instances {
            instance.active = false;
            instance.lifetime = 0.0;
        }
    }

    /// Live enemies that are bosses
    pub fn bosses(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.is_boss())
    }
}
