//! Hit testing and damage resolution between jutsu and enemies
//!
//! One sweep per tick: every active instance is tested against the enemy list
//! as it stood at the start of the sweep. Dead enemies stay in the list until
//! the orchestrator filters them, so indices are stable for the whole sweep.

use std::sync::Arc;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, HIT_FLASH_DURATION};
use super::jutsu::Jutsu;
use super::state::JutsuInstance;

/// Inclusive distance check
#[inline]
pub fn is_colliding(a: Vec3, b: Vec3, threshold: f32) -> bool {
    a.distance(b) <= threshold
}

/// Damage left after armor: `floor(d * 100 / (armor + 100))`.
///
/// Positive damage always lands at least 1; zero damage stays zero.
pub fn mitigate(damage: u32, armor: u32) -> u32 {
    if damage == 0 || armor == 0 {
        return damage;
    }
    let reduced = damage as u64 * 100 / (armor as u64 + 100);
    (reduced as u32).max(1)
}

/// Camera shake handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenShake {
    pub amplitude: f32,
    /// Seconds
    pub duration: f32,
}

const SHAKE_AMPLITUDE_CAP: f32 = 0.5;
const SHAKE_AMPLITUDE_SCALE: f32 = 0.05;
const SHAKE_DURATION_CAP: f32 = 0.5;
const SHAKE_DURATION_BASE: f32 = 0.2;
const SHAKE_DURATION_SCALE: f32 = 0.02;

/// Shake for a hit of `damage`; grows with damage, capped on both axes
pub fn screen_shake(damage: u32) -> ScreenShake {
    let d = damage as f32;
    ScreenShake {
        amplitude: (d * SHAKE_AMPLITUDE_SCALE).min(SHAKE_AMPLITUDE_CAP),
        duration: (SHAKE_DURATION_BASE + d * SHAKE_DURATION_SCALE).min(SHAKE_DURATION_CAP),
    }
}

/// Result of applying damage to one enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageResult {
    /// Health actually removed
    pub dealt: u32,
    /// Absorbed by the enemy's shield
    pub absorbed: u32,
    /// This hit took the enemy from alive to 0
    pub killed: bool,
}

/// Apply armor, then shield, then health (floored at 0)
pub fn apply_damage(enemy: &mut Enemy, damage: u32) -> DamageResult {
    let mitigated = mitigate(damage, enemy.armor);
    let absorbed = mitigated.min(enemy.shield);
    enemy.shield -= absorbed;

    let remaining = mitigated - absorbed;
    let was_alive = enemy.is_alive();
    let dealt = remaining.min(enemy.health);
    enemy.health -= dealt;
    enemy.hit_flash = HIT_FLASH_DURATION;

    DamageResult {
        dealt,
        absorbed,
        killed: was_alive && !enemy.is_alive(),
    }
}

/// Player-side damage modifiers for one sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitModifiers {
    /// Percent of base damage (100 = unchanged)
    pub damage_percent: u32,
    /// Added to each jutsu's own critical chance
    pub crit_bonus: u32,
    /// Critical damage in percent of normal
    pub crit_multiplier_percent: u32,
}

impl Default for HitModifiers {
    fn default() -> Self {
        Self {
            damage_percent: 100,
            crit_bonus: 0,
            crit_multiplier_percent: 200,
        }
    }
}

/// Damage a jutsu deals to `enemy` before armor, and whether it crit.
///
/// The RNG is only consulted when there is a critical chance at all.
pub fn outgoing_damage<R: Rng + ?Sized>(
    jutsu: &Jutsu,
    enemy: &Enemy,
    modifiers: &HitModifiers,
    rng: &mut R,
) -> (u32, bool) {
    let mut damage = jutsu.damage as u64;
    if enemy.is_boss() {
        damage += jutsu.boss_bonus.unwrap_or(0) as u64;
    }
    damage = damage * modifiers.damage_percent as u64 / 100;

    let chance = jutsu.crit_chance.unwrap_or(0) + modifiers.crit_bonus;
    let critical = damage > 0 && chance > 0 && rng.random_range(0..100) < chance;
    if critical {
        damage = damage * modifiers.crit_multiplier_percent as u64 / 100;
    }

    (damage.min(u32::MAX as u64) as u32, critical)
}

/// One resolved projectile hit
#[derive(Debug, Clone)]
pub struct Hit {
    pub instance_id: u32,
    pub jutsu: Arc<Jutsu>,
    /// Index into the enemy list the sweep ran over
    pub enemy_index: usize,
    pub enemy_id: u32,
    pub damage: DamageResult,
    pub critical: bool,
    pub shake: ScreenShake,
}

/// Resolve every active instance against the enemy list.
///
/// An instance hits at most one enemy (the first in list order within reach)
/// and is deactivated on that hit. Dead or cloaked enemies are skipped.
pub fn sweep<R: Rng + ?Sized>(
    instances: &mut [JutsuInstance],
    enemies: &mut [Enemy],
    modifiers: &HitModifiers,
    rng: &mut R,
) -> Vec<Hit> {
    let mut hits = Vec::new();

    for instance in instances.iter_mut().filter(|i| i.active) {
        let reach = instance.jutsu.reach();
        let target = enemies
            .iter()
            .position(|e| e.can_be_hit() && is_colliding(instance.position, e.position, reach));

        let Some(index) = target else {
            continue;
        };
        instance.active = false;

        let enemy = &mut enemies[index];
        let (raw, critical) = outgoing_damage(&instance.jutsu, enemy, modifiers, rng);
        let damage = apply_damage(enemy, raw);

        hits.push(Hit {
            instance_id: instance.id,
            jutsu: Arc::clone(&instance.jutsu),
            enemy_index: index,
            enemy_id: enemy.id,
            damage,
            critical,
            shake: screen_shake(damage.dealt),
        });
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::boss::{BossKind, create_boss};
    use crate::sim::enemy::EnemyKind;
    use crate::sim::jutsu::JutsuCatalog;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy_at(id: u32, position: Vec3, health: u32) -> Enemy {
        Enemy::plain(id, EnemyKind::Basic, position, Vec3::ZERO, health, 1.0, 1)
    }

    fn instance_at(id: u32, jutsu_id: &str, position: Vec3) -> JutsuInstance {
        let catalog = JutsuCatalog::standard();
        let jutsu = catalog.get(jutsu_id).cloned().unwrap();
        JutsuInstance::new(id, jutsu, position, Vec3::ZERO)
    }

    #[test]
    fn test_collision_boundary() {
        let a = Vec3::ZERO;
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert!(is_colliding(a, b, 5.0));
        assert!(!is_colliding(a, b, 4.999));
        assert!(is_colliding(a, Vec3::new(1.0, 0.0, 0.0), 1.0));
        assert!(!is_colliding(a, Vec3::new(1.001, 0.0, 0.0), 1.0));
    }

    #[test]
    fn test_armor_mitigation() {
        assert_eq!(mitigate(50, 20), 41);
        assert_eq!(mitigate(50, 0), 50);
        assert_eq!(mitigate(1, 1000), 1);
        assert_eq!(mitigate(0, 20), 0);
    }

    #[test]
    fn test_shake_capped() {
        let small = screen_shake(2);
        assert!((small.amplitude - 0.1).abs() < 1e-6);
        assert!((small.duration - 0.24).abs() < 1e-6);

        let huge = screen_shake(10_000);
        assert_eq!(huge.amplitude, 0.5);
        assert_eq!(huge.duration, 0.5);
    }

    #[test]
    fn test_shield_absorbs_after_armor() {
        let mut enemy = enemy_at(1, Vec3::ZERO, 100);
        enemy.armor = 20;
        enemy.shield = 30;

        let result = apply_damage(&mut enemy, 50);
        assert_eq!(result.absorbed, 30);
        assert_eq!(result.dealt, 11);
        assert_eq!(enemy.health, 89);
        assert_eq!(enemy.shield, 0);
        assert!(!result.killed);
        assert_eq!(enemy.hit_flash, HIT_FLASH_DURATION);
    }

    #[test]
    fn test_one_hit_per_instance() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemies = vec![
            enemy_at(1, Vec3::new(0.5, 0.0, 0.0), 100),
            enemy_at(2, Vec3::new(-0.5, 0.0, 0.0), 100),
        ];
        let mut instances = vec![instance_at(10, "fireball", Vec3::ZERO)];

        let hits = sweep(&mut instances, &mut enemies, &HitModifiers::default(), &mut rng);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].enemy_id, 1);
        assert!(!instances[0].active);
        assert_eq!(enemies[0].health, 70);
        assert_eq!(enemies[1].health, 100);

        // Inactive instances never hit again
        let again = sweep(&mut instances, &mut enemies, &HitModifiers::default(), &mut rng);
        assert!(again.is_empty());
    }

    #[test]
    fn test_dead_and_cloaked_enemies_skipped() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut dead = enemy_at(1, Vec3::ZERO, 1);
        dead.health = 0;
        let mut cloaked = enemy_at(2, Vec3::ZERO, 10);
        cloaked.stealth = Some(crate::sim::enemy::Stealth {
            period: 3.0,
            timer: 0.0,
            invisible: true,
        });
        let mut enemies = vec![dead, cloaked, enemy_at(3, Vec3::ZERO, 10)];
        let mut instances = vec![instance_at(10, "fireball", Vec3::ZERO)];

        let hits = sweep(&mut instances, &mut enemies, &HitModifiers::default(), &mut rng);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].enemy_id, 3);
        assert!(hits[0].damage.killed);
    }

    #[test]
    fn test_zero_damage_hit_is_legal() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemies = vec![enemy_at(1, Vec3::ZERO, 5)];
        enemies[0].armor = 50;
        let mut instances = vec![instance_at(10, "earth_wall", Vec3::ZERO)];

        let hits = sweep(&mut instances, &mut enemies, &HitModifiers::default(), &mut rng);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].damage.dealt, 0);
        assert_eq!(enemies[0].health, 5);
        assert!(!instances[0].active);
    }

    #[test]
    fn test_boss_bonus_and_attack_buff() {
        let mut rng = Pcg32::seed_from_u64(1);
        let catalog = JutsuCatalog::standard();
        let lightning = catalog.get("lightning").unwrap();
        let boss = create_boss(1, BossKind::Itachi, 5);
        let grunt = enemy_at(2, Vec3::ZERO, 10);

        let (vs_boss, _) = outgoing_damage(lightning, &boss, &HitModifiers::default(), &mut rng);
        assert_eq!(vs_boss, 70);
        let (vs_grunt, _) = outgoing_damage(lightning, &grunt, &HitModifiers::default(), &mut rng);
        assert_eq!(vs_grunt, 50);

        let buffed = HitModifiers {
            damage_percent: 150,
            ..Default::default()
        };
        let (boosted, _) = outgoing_damage(lightning, &grunt, &buffed, &mut rng);
        assert_eq!(boosted, 75);
    }

    #[test]
    fn test_guaranteed_crit() {
        let mut rng = Pcg32::seed_from_u64(1);
        let catalog = JutsuCatalog::standard();
        let fireball = catalog.get("fireball").unwrap();
        let grunt = enemy_at(2, Vec3::ZERO, 10);
        let always = HitModifiers {
            crit_bonus: 100,
            ..Default::default()
        };
        assert_eq!(outgoing_damage(fireball, &grunt, &always, &mut rng), (60, true));
    }

    proptest! {
        #[test]
        fn prop_health_never_underflows(health in 0u32..1000, damage in 0u32..100_000, armor in 0u32..200) {
            let mut enemy = enemy_at(1, Vec3::ZERO, health.max(1));
            enemy.health = health;
            enemy.armor = armor;
            let result = apply_damage(&mut enemy, damage);
            prop_assert!(enemy.health <= health);
            prop_assert_eq!(enemy.health, health - result.dealt);
        }

        #[test]
        fn prop_positive_damage_through_armor(damage in 1u32..100_000, armor in 0u32..100_000) {
            prop_assert!(mitigate(damage, armor) >= 1);
            prop_assert!(mitigate(damage, armor) <= damage);
        }
    }
}
