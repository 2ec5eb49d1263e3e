//! Boss configurations, the boss factory and skill selection
//!
//! Boss stats are fixed per boss and never scale with the wave; the wave is
//! recorded only to know where the boss came from.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind};
use crate::consts::BOSS_SPAWN;

/// The six bosses, in the order boss waves cycle through them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossKind {
    NineTails,
    Orochimaru,
    Itachi,
    Pain,
    Madara,
    Kaguya,
}

/// What a boss skill does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillEffect {
    Projectile,
    Area,
    Buff,
    Summon,
    Shield,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossSkill {
    pub id: &'static str,
    /// Seconds
    pub cooldown: f32,
    pub damage: u32,
    pub effect: SkillEffect,
    pub range: Option<f32>,
    /// Seconds the effect lasts, for timed effects
    pub duration: Option<f32>,
}

impl BossSkill {
    const fn ranged(id: &'static str, cooldown: f32, damage: u32, effect: SkillEffect, range: f32) -> Self {
        Self {
            id,
            cooldown,
            damage,
            effect,
            range: Some(range),
            duration: None,
        }
    }

    const fn timed(id: &'static str, cooldown: f32, effect: SkillEffect, duration: f32) -> Self {
        Self {
            id,
            cooldown,
            damage: 0,
            effect,
            range: None,
            duration: Some(duration),
        }
    }

    const fn plain(id: &'static str, cooldown: f32, effect: SkillEffect) -> Self {
        Self {
            id,
            cooldown,
            damage: 0,
            effect,
            range: None,
            duration: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossConfig {
    pub name: &'static str,
    pub health: u32,
    pub size: f32,
    pub speed: f32,
    pub armor: u32,
    pub color: u32,
    /// Score awarded on kill
    pub reward: u64,
    pub skills: &'static [BossSkill],
}

use SkillEffect::*;

static NINE_TAILS: BossConfig = BossConfig {
    name: "Nine-Tails",
    health: 500,
    size: 6.0,
    speed: 1.5,
    armor: 20,
    color: 0xff6600,
    reward: 5000,
    skills: &[
        BossSkill::ranged("tail_strike", 5.0, 100, Projectile, 20.0),
        BossSkill::ranged("roar", 10.0, 80, Area, 15.0),
        BossSkill::timed("rage", 20.0, Buff, 10.0),
    ],
};

static OROCHIMARU: BossConfig = BossConfig {
    name: "Orochimaru",
    health: 400,
    size: 5.0,
    speed: 2.0,
    armor: 10,
    color: 0x9932cc,
    reward: 4000,
    skills: &[
        BossSkill::ranged("snake_bite", 3.0, 60, Projectile, 15.0),
        BossSkill::plain("summon_snakes", 15.0, Summon),
        BossSkill::timed("rebirth", 30.0, Buff, 5.0),
    ],
};

static ITACHI: BossConfig = BossConfig {
    name: "Itachi",
    health: 350,
    size: 4.0,
    speed: 2.5,
    armor: 5,
    color: 0xcc0000,
    reward: 4500,
    skills: &[
        BossSkill::ranged("amaterasu_boss", 8.0, 120, Area, 10.0),
        BossSkill::ranged("tsukuyomi_boss", 12.0, 50, Area, 20.0),
        BossSkill::timed("susano", 25.0, Shield, 8.0),
    ],
};

static PAIN: BossConfig = BossConfig {
    name: "Pain",
    health: 600,
    size: 5.0,
    speed: 1.8,
    armor: 25,
    color: 0xffa500,
    reward: 6000,
    skills: &[
        BossSkill::ranged("shinra_tensei_boss", 10.0, 150, Area, 20.0),
        BossSkill::ranged("basho_tennin", 8.0, 80, Area, 15.0),
        BossSkill::ranged("chibaku_tensei_boss", 30.0, 200, Area, 25.0),
    ],
};

static MADARA: BossConfig = BossConfig {
    name: "Madara",
    health: 800,
    size: 6.0,
    speed: 2.0,
    armor: 30,
    color: 0x4b0082,
    reward: 8000,
    skills: &[
        BossSkill::ranged("fire_style", 6.0, 100, Area, 18.0),
        BossSkill::timed("susano_boss", 20.0, Shield, 10.0),
        BossSkill::ranged("meteor", 40.0, 300, Area, 30.0),
    ],
};

static KAGUYA: BossConfig = BossConfig {
    name: "Kaguya",
    health: 1000,
    size: 7.0,
    speed: 1.5,
    armor: 40,
    color: 0xe6e6fa,
    reward: 15000,
    skills: &[
        BossSkill::timed("dimension_shift", 15.0, Buff, 3.0),
        BossSkill::ranged("ash_bones", 5.0, 200, Projectile, 20.0),
        BossSkill::ranged("expansive_truth", 35.0, 400, Area, 35.0),
        BossSkill::ranged("infinite_tsukuyomi", 60.0, 0, Area, 50.0),
    ],
};

impl BossKind {
    pub const ALL: [BossKind; 6] = [
        BossKind::NineTails,
        BossKind::Orochimaru,
        BossKind::Itachi,
        BossKind::Pain,
        BossKind::Madara,
        BossKind::Kaguya,
    ];

    pub fn config(&self) -> &'static BossConfig {
        match self {
            BossKind::NineTails => &NINE_TAILS,
            BossKind::Orochimaru => &OROCHIMARU,
            BossKind::Itachi => &ITACHI,
            BossKind::Pain => &PAIN,
            BossKind::Madara => &MADARA,
            BossKind::Kaguya => &KAGUYA,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BossKind::NineTails => "nine_tails",
            BossKind::Orochimaru => "orochimaru",
            BossKind::Itachi => "itachi",
            BossKind::Pain => "pain",
            BossKind::Madara => "madara",
            BossKind::Kaguya => "kaguya",
        }
    }

    /// Boss for a boss wave: the n-th boss wave gets the n-th boss, cycling
    pub fn for_wave(wave: u32, interval: u32) -> Self {
        let nth = (wave / interval.max(1)).saturating_sub(1) as usize;
        Self::ALL[nth % Self::ALL.len()]
    }
}

/// Boss-only part of an enemy record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossState {
    pub kind: BossKind,
    /// Seconds until each skill is ready, parallel to the config's skills
    pub skill_cooldowns: Vec<f32>,
    pub reward: u64,
}

impl BossState {
    pub fn skills(&self) -> &'static [BossSkill] {
        self.kind.config().skills
    }

    pub fn cool_down(&mut self, dt: f32) {
        for cd in &mut self.skill_cooldowns {
            *cd = (*cd - dt).max(0.0);
        }
    }

    /// Indices of skills that can fire now
    pub fn ready_skills(&self) -> Vec<usize> {
        self.skill_cooldowns
            .iter()
            .enumerate()
            .filter(|(_, cd)| **cd <= 0.0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Put a skill on cooldown after it fires
    pub fn trigger(&mut self, index: usize) -> Option<&'static BossSkill> {
        let skill = self.skills().get(index)?;
        if let Some(cd) = self.skill_cooldowns.get_mut(index) {
            *cd = skill.cooldown;
        }
        Some(skill)
    }

    pub fn reset_cooldowns(&mut self) {
        self.skill_cooldowns.iter_mut().for_each(|cd| *cd = 0.0);
    }
}

/// Build a boss enemy. Every skill starts ready.
pub fn create_boss(id: u32, kind: BossKind, wave: u32) -> Enemy {
    let config = kind.config();
    let mut enemy = Enemy::plain(
        id,
        EnemyKind::Boss(kind),
        BOSS_SPAWN,
        Vec3::new(-config.speed, 0.0, 0.0),
        config.health,
        config.size,
        wave,
    );
    enemy.armor = config.armor;
    enemy.color = config.color;
    enemy.boss = Some(BossState {
        kind,
        skill_cooldowns: vec![0.0; config.skills.len()],
        reward: config.reward,
    });
    enemy
}

/// Decides which ready skill a boss uses this frame
pub trait BossBrain {
    /// Pick one of `ready` (skill indices), or hold with `None`
    fn choose_skill(&self, boss: &Enemy, ready: &[usize]) -> Option<usize>;
}

/// Fires the first skill that is off cooldown
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstReady;

impl BossBrain for FirstReady {
    fn choose_skill(&self, _boss: &Enemy, ready: &[usize]) -> Option<usize> {
        ready.first().copied()
    }
}

/// Fires the hardest-hitting ready skill, and only inside its range
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggressive;

impl BossBrain for Aggressive {
    fn choose_skill(&self, boss: &Enemy, ready: &[usize]) -> Option<usize> {
        let state = boss.boss.as_ref()?;
        let skills = state.skills();
        // Distance to the defeat line stands in for distance to the player
        let distance = (boss.position.x - crate::consts::DEFEAT_LINE_X).abs();
        ready
            .iter()
            .copied()
            .filter(|&i| {
                skills
                    .get(i)
                    .is_some_and(|s| s.range.is_none_or(|r| distance <= r))
            })
            .max_by_key(|&i| skills.get(i).map(|s| s.damage).unwrap_or(0))
    }
}
