//! Enemy records and the regular enemy factory

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::boss::{BossKind, BossState, create_boss};
use super::wave::wave_config;
use crate::consts::*;
use crate::ring_offset;

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
    Flying,
    Splitting,
    Stealth,
    Exploder,
    Summoner,
    Boss(BossKind),
}

/// Spawn weight and first wave for each regular kind
const KIND_WEIGHTS: [(EnemyKind, u32, u32); 8] = [
    (EnemyKind::Basic, 50, 1),
    (EnemyKind::Fast, 25, 2),
    (EnemyKind::Tank, 15, 3),
    (EnemyKind::Flying, 10, 4),
    (EnemyKind::Splitting, 8, 5),
    (EnemyKind::Stealth, 5, 6),
    (EnemyKind::Exploder, 5, 7),
    (EnemyKind::Summoner, 3, 8),
];

impl EnemyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "basic",
            EnemyKind::Fast => "fast",
            EnemyKind::Tank => "tank",
            EnemyKind::Flying => "flying",
            EnemyKind::Splitting => "splitting",
            EnemyKind::Stealth => "stealth",
            EnemyKind::Exploder => "exploder",
            EnemyKind::Summoner => "summoner",
            EnemyKind::Boss(kind) => kind.as_str(),
        }
    }

    /// Display color (RGB hex)
    pub fn color(&self) -> u32 {
        match self {
            EnemyKind::Basic => 0xff4444,
            EnemyKind::Fast => 0x00ffff,
            EnemyKind::Tank => 0x44ff44,
            EnemyKind::Flying => 0xff88ff,
            EnemyKind::Splitting => 0xffff00,
            EnemyKind::Stealth => 0x888888,
            EnemyKind::Exploder => 0xff8800,
            EnemyKind::Summoner => 0x8800ff,
            EnemyKind::Boss(kind) => kind.config().color,
        }
    }

    /// (speed, health, size) multipliers on the wave baseline
    fn modifiers(&self) -> (f32, f32, f32) {
        match self {
            EnemyKind::Fast => (1.8, 0.6, 0.8),
            EnemyKind::Tank => (0.5, 3.0, 1.5),
            EnemyKind::Flying => (1.2, 0.8, 0.9),
            EnemyKind::Splitting => (1.0, 1.5, 1.2),
            EnemyKind::Stealth => (1.3, 0.7, 0.85),
            EnemyKind::Exploder => (1.5, 0.5, 0.9),
            EnemyKind::Summoner => (0.6, 2.0, 1.3),
            EnemyKind::Basic | EnemyKind::Boss(_) => (1.0, 1.0, 1.0),
        }
    }

    /// Weighted pick among the kinds unlocked by `wave`
    pub fn pick<R: Rng + ?Sized>(wave: u32, rng: &mut R) -> Self {
        let eligible = KIND_WEIGHTS.iter().filter(|(_, _, unlock)| wave >= *unlock);
        let total: u32 = eligible.clone().map(|(_, weight, _)| weight).sum();
        if total == 0 {
            return EnemyKind::Basic;
        }

        let mut roll = rng.random_range(0..total);
        for (kind, weight, _) in eligible {
            if roll < *weight {
                return *kind;
            }
            roll -= weight;
        }
        EnemyKind::Basic
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummonAbility {
    pub count: u32,
    /// Seconds between summons
    pub cooldown: f32,
    /// Seconds until the next summon
    pub timer: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub damage: u32,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stealth {
    /// Seconds per visible/invisible phase
    pub period: f32,
    pub timer: f32,
    pub invisible: bool,
}

/// Seconds an enemy flashes after a hit
pub const HIT_FLASH_DURATION: f32 = 0.1;

/// A live enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub position: Vec3,
    pub velocity: Vec3,
    pub health: u32,
    pub max_health: u32,
    pub size: f32,
    /// Wave the enemy was spawned in
    pub wave: u32,
    pub armor: u32,
    /// Absorbs damage after armor
    pub shield: u32,
    pub color: u32,
    pub can_fly: bool,
    pub split_count: u32,
    pub summon: Option<SummonAbility>,
    pub explosion: Option<Explosion>,
    pub stealth: Option<Stealth>,
    pub boss: Option<BossState>,
    /// Drives the vertical drift of flyers
    pub flight_phase: f32,
    /// Seconds of hit flash left
    pub hit_flash: f32,
}

impl Enemy {
    /// A plain enemy with no behavior attached
    pub fn plain(id: u32, kind: EnemyKind, position: Vec3, velocity: Vec3, health: u32, size: f32, wave: u32) -> Self {
        Self {
            id,
            kind,
            position,
            velocity,
            health,
            max_health: health,
            size,
            wave,
            armor: 0,
            shield: 0,
            color: kind.color(),
            can_fly: false,
            split_count: 0,
            summon: None,
            explosion: None,
            stealth: None,
            boss: None,
            flight_phase: 0.0,
            hit_flash: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    pub fn is_invisible(&self) -> bool {
        self.stealth.is_some_and(|s| s.invisible)
    }

    /// Alive and not cloaked
    pub fn can_be_hit(&self) -> bool {
        self.is_alive() && !self.is_invisible()
    }

    pub fn can_split(&self) -> bool {
        self.split_count > 0
    }

    /// Apply a difficulty multiplier to health, floored and never below 1
    pub fn scale_health(&mut self, scale: f32) {
        let scaled = ((self.max_health as f32 * scale).floor() as u32).max(1);
        self.max_health = scaled;
        self.health = scaled;
    }

    /// Advance position and behavior timers
    pub fn advance(&mut self, dt: f32, speed_scale: f32) {
        if self.can_fly {
            self.flight_phase += dt;
            self.velocity.y = self.flight_phase.sin() * FLYING_DRIFT;
        }
        self.position += self.velocity * (dt * speed_scale);

        if let Some(stealth) = self.stealth.as_mut() {
            stealth.timer += dt;
            if stealth.timer >= stealth.period {
                stealth.timer = 0.0;
                stealth.invisible = !stealth.invisible;
            }
        }

        self.hit_flash = (self.hit_flash - dt).max(0.0);
    }

    pub fn has_breached(&self) -> bool {
        self.position.x <= DEFEAT_LINE_X
    }
}

/// Build one regular enemy for `wave`. With no kind, one is picked by weight.
///
/// Asking for a boss kind delegates to [`create_boss`].
pub fn create_enemy<R: Rng + ?Sized>(id: u32, wave: u32, kind: Option<EnemyKind>, rng: &mut R) -> Enemy {
    let wave = wave.max(1);
    let kind = kind.unwrap_or_else(|| EnemyKind::pick(wave, rng));
    if let EnemyKind::Boss(boss_kind) = kind {
        return create_boss(id, boss_kind, wave);
    }

    let config = wave_config(wave);
    let (speed_mul, health_mul, size_mul) = kind.modifiers();

    let y = (rng.random::<f32>() - 0.5) * SPAWN_SPREAD_Y;
    let z = if kind == EnemyKind::Flying { FLYING_ALTITUDE } else { 0.0 };
    let health = ((config.health as f32 * health_mul).floor() as u32).max(1);

    let mut enemy = Enemy::plain(
        id,
        kind,
        Vec3::new(SPAWN_EDGE_X, y, z),
        Vec3::new(-config.speed * speed_mul, 0.0, 0.0),
        health,
        config.size * size_mul,
        wave,
    );

    match kind {
        EnemyKind::Tank => enemy.armor = 5,
        EnemyKind::Flying => {
            enemy.can_fly = true;
            enemy.flight_phase = rng.random::<f32>() * std::f32::consts::TAU;
        }
        EnemyKind::Splitting => enemy.split_count = 3,
        EnemyKind::Stealth => {
            enemy.stealth = Some(Stealth {
                period: 3.0,
                timer: 0.0,
                invisible: false,
            })
        }
        EnemyKind::Exploder => {
            enemy.explosion = Some(Explosion {
                damage: config.health * 2,
                radius: 5.0,
            })
        }
        EnemyKind::Summoner => {
            enemy.summon = Some(SummonAbility {
                count: 2,
                cooldown: 5.0,
                timer: 0.0,
            })
        }
        _ => {}
    }

    enemy
}

/// Children left behind by a splitting enemy. Ids start at `first_id`.
pub fn create_split_enemies(parent: &Enemy, first_id: u32) -> Vec<Enemy> {
    let count = parent.split_count;
    let health = ((parent.max_health as f32 * 0.3).floor() as u32).max(1);
    (0..count)
        .map(|i| {
            let (angle, offset) = ring_offset(i, count, SPLIT_RADIUS);
            Enemy::plain(
                first_id + i,
                EnemyKind::Basic,
                parent.position + offset,
                Vec3::new(parent.velocity.x * 1.2, angle.sin() * 2.0, 0.0),
                health,
                parent.size * 0.6,
                parent.wave,
            )
        })
        .collect()
}

/// Minions called by a summoner (or a boss summon skill)
pub fn create_summoned_enemies(summoner: &Enemy, count: u32, first_id: u32) -> Vec<Enemy> {
    let health = ((summoner.max_health as f32 * 0.2).floor() as u32).max(1);
    (0..count)
        .map(|i| {
            let (_, offset) = ring_offset(i, count, SUMMON_RADIUS);
            Enemy::plain(
                first_id + i,
                EnemyKind::Fast,
                summoner.position + offset,
                Vec3::new(summoner.velocity.x * 1.5, 0.0, 0.0),
                health,
                summoner.size * 0.5,
                summoner.wave,
            )
        })
        .collect()
}
