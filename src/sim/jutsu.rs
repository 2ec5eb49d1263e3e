//! Jutsu catalog, seal matching and chakra release
//!
//! The catalog is built (and validated) once at startup and shared read-only
//! afterwards; every live projectile holds an `Arc` to its entry.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::buffs::BuffKind;
use super::seals::SealSymbol;
use crate::consts::HIT_RADIUS;
use crate::error::{CatalogError, ConfigError};

/// Longest seal sequence a jutsu may require
pub const MAX_JUTSU_SEALS: usize = 4;

/// How a jutsu behaves once released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectType {
    Projectile,
    Area,
    Shield,
    Buff,
    Debuff,
    Ultimate,
    Forbidden,
}

/// Timed effect granted on release
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuffSpec {
    pub kind: BuffKind,
    /// Seconds
    pub duration: f32,
    /// Percent; negative for debuffs
    pub magnitude: i32,
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jutsu {
    pub id: String,
    pub name: String,
    pub seals: Vec<SealSymbol>,
    pub chakra_cost: f32,
    /// Seconds before the same jutsu can be released again
    pub cooldown: f32,
    pub damage: u32,
    pub effect: EffectType,
    /// Extra damage against bosses
    #[serde(default)]
    pub boss_bonus: Option<u32>,
    #[serde(default)]
    pub buff: Option<BuffSpec>,
    /// Reach of the hit test; defaults to `HIT_RADIUS`
    #[serde(default)]
    pub hit_radius: Option<f32>,
    /// Critical hit chance in percent
    #[serde(default)]
    pub crit_chance: Option<u32>,
    /// RGB hex for the renderer
    #[serde(default)]
    pub color: u32,
}

impl Jutsu {
    #[allow(clippy::too_many_arguments)]
    fn entry(
        id: &str,
        name: &str,
        seals: &[SealSymbol],
        chakra_cost: f32,
        cooldown_ms: u32,
        damage: u32,
        effect: EffectType,
        color: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            seals: seals.to_vec(),
            chakra_cost,
            cooldown: cooldown_ms as f32 / 1000.0,
            damage,
            effect,
            boss_bonus: None,
            buff: None,
            hit_radius: None,
            crit_chance: None,
            color,
        }
    }

    fn boss_bonus(mut self, bonus: u32) -> Self {
        self.boss_bonus = Some(bonus);
        self
    }

    fn buff(mut self, kind: BuffKind, duration_ms: u32, magnitude: i32) -> Self {
        self.buff = Some(BuffSpec {
            kind,
            duration: duration_ms as f32 / 1000.0,
            magnitude,
        });
        self
    }

    fn radius(mut self, radius: f32) -> Self {
        self.hit_radius = Some(radius);
        self
    }

    fn crit(mut self, chance: u32) -> Self {
        self.crit_chance = Some(chance);
        self
    }

    /// Collision threshold for instances of this jutsu
    pub fn reach(&self) -> f32 {
        self.hit_radius.unwrap_or(HIT_RADIUS)
    }
}

/// Player chakra pool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chakra {
    pub current: f32,
    pub max: f32,
}

impl Chakra {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Add chakra, never past max
    pub fn restore(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }

    /// Fraction of the pool currently available
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }
}

/// True when the pool covers the jutsu's cost (inclusive)
pub fn can_release_jutsu(chakra: &Chakra, jutsu: &Jutsu) -> bool {
    chakra.current >= jutsu.chakra_cost
}

/// Chakra left after paying for `jutsu`, floored at zero.
///
/// Pure: the input pool is not touched and nothing is spawned.
pub fn release_jutsu(chakra: &Chakra, jutsu: &Jutsu) -> Chakra {
    Chakra {
        current: (chakra.current - jutsu.chakra_cost).max(0.0),
        max: chakra.max,
    }
}

/// Check a list of entries for anything that would make matching ambiguous
pub fn validate_catalog(entries: &[Jutsu]) -> Result<(), CatalogError> {
    if entries.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut ids = HashSet::new();
    let mut sequences: HashMap<&[SealSymbol], &str> = HashMap::new();

    for jutsu in entries {
        if jutsu.seals.is_empty() {
            return Err(CatalogError::EmptySeals { id: jutsu.id.clone() });
        }
        if jutsu.seals.len() > MAX_JUTSU_SEALS {
            return Err(CatalogError::TooManySeals {
                id: jutsu.id.clone(),
                len: jutsu.seals.len(),
                max: MAX_JUTSU_SEALS,
            });
        }
        if !ids.insert(jutsu.id.as_str()) {
            return Err(CatalogError::DuplicateId { id: jutsu.id.clone() });
        }
        if let Some(first) = sequences.insert(jutsu.seals.as_slice(), jutsu.id.as_str()) {
            return Err(CatalogError::DuplicateSequence {
                first: first.to_string(),
                second: jutsu.id.clone(),
                seals: jutsu.seals.clone(),
            });
        }
    }

    Ok(())
}

/// Validated, read-only jutsu table ordered longest sequence first
#[derive(Debug, Clone)]
pub struct JutsuCatalog {
    entries: Vec<Arc<Jutsu>>,
}

impl Default for JutsuCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl JutsuCatalog {
    /// Validate and index a set of entries
    pub fn new(entries: Vec<Jutsu>) -> Result<Self, CatalogError> {
        validate_catalog(&entries)?;
        Ok(Self::ordered(entries))
    }

    /// Load a catalog from a JSON array of entries
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let entries: Vec<Jutsu> = serde_json::from_str(json)?;
        Self::new(entries).map_err(|err| {
            log::warn!("Rejected jutsu catalog: {}", err);
            ConfigError::from(err)
        })
    }

    /// The built-in catalog
    pub fn standard() -> Self {
        Self::ordered(standard_jutsu())
    }

    fn ordered(mut entries: Vec<Jutsu>) -> Self {
        // Stable: equal lengths keep declaration order
        entries.sort_by_key(|j| Reverse(j.seals.len()));
        Self {
            entries: entries.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let entries: Vec<Jutsu> = self.entries.iter().map(|j| (**j).clone()).collect();
        validate_catalog(&entries)
    }

    /// Exact, order-sensitive lookup. Longer sequences are checked first.
    pub fn match_jutsu(&self, seals: &[SealSymbol]) -> Option<&Arc<Jutsu>> {
        if seals.is_empty() {
            return None;
        }
        self.entries.iter().find(|j| j.seals.as_slice() == seals)
    }

    /// Whether some entry of at most `max_len` seals continues `prefix`
    pub fn has_extension(&self, prefix: &[SealSymbol], max_len: usize) -> bool {
        self.entries
            .iter()
            .any(|j| j.seals.len() > prefix.len() && j.seals.len() <= max_len && j.seals.starts_with(prefix))
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Jutsu>> {
        self.entries.iter().find(|j| j.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Jutsu>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn standard_jutsu() -> Vec<Jutsu> {
    use BuffKind as B;
    use EffectType::*;
    use SealSymbol::{Earth, Fire, Thunder, Water, Wind};

    vec![
        // Single seals
        Jutsu::entry("fireball", "Fire Style: Great Fireball", &[Fire], 20.0, 1000, 30, Projectile, 0xff4500),
        Jutsu::entry("water_dragon", "Water Style: Water Dragon Bullet", &[Water], 25.0, 1500, 35, Projectile, 0x1e90ff),
        Jutsu::entry("lightning", "Lightning Style: Chidori", &[Thunder], 30.0, 2000, 50, Projectile, 0x00ffff)
            .boss_bonus(20),
        Jutsu::entry("wind_blade", "Wind Style: Rasenshuriken", &[Wind], 15.0, 800, 25, Projectile, 0x90ee90),
        Jutsu::entry("earth_wall", "Earth Style: Mud Wall", &[Earth], 40.0, 3000, 0, Shield, 0x8b4513)
            .buff(B::Defense, 5000, 50),
        // Two-seal combos
        Jutsu::entry("fire_thunder_combo", "Fire Style: Dragon Flame", &[Fire, Thunder], 50.0, 3000, 80, Area, 0xff6600),
        Jutsu::entry("water_wind_combo", "Water Style: Storm Dragon", &[Water, Wind], 45.0, 2500, 70, Projectile, 0x4169e1),
        Jutsu::entry("earth_fire_combo", "Fire Style: Flame Bullet", &[Earth, Fire], 55.0, 3500, 90, Area, 0xff8c00)
            .boss_bonus(30),
        Jutsu::entry("thunder_water_combo", "Lightning Style: Thunder Dragon", &[Thunder, Water], 60.0, 4000, 100, Projectile, 0x7b68ee)
            .boss_bonus(40),
        // Ultimates
        Jutsu::entry("rasenshuriken_ultimate", "Wind Style: Rasenshuriken Ultimate", &[Wind, Fire, Thunder], 80.0, 8000, 200, Ultimate, 0x00ff88)
            .boss_bonus(100),
        Jutsu::entry("amaterasu", "Amaterasu", &[Fire, Fire, Fire], 100.0, 10000, 300, Ultimate, 0x1a0a2e)
            .boss_bonus(150),
        Jutsu::entry("kirin", "Lightning Style: Kirin", &[Thunder, Thunder, Fire], 90.0, 9000, 250, Ultimate, 0xccff00)
            .boss_bonus(120),
        // Support
        Jutsu::entry("chakra_regen", "Yang Style: Chakra Surge", &[Fire, Earth], 30.0, 15000, 0, Buff, 0xffd700)
            .buff(B::Chakra, 10000, 200),
        Jutsu::entry("shadow_clone_buff", "Multi Shadow Clone", &[Wind, Wind], 35.0, 12000, 0, Buff, 0xffaa00)
            .buff(B::Attack, 8000, 50),
        Jutsu::entry("body_flicker", "Body Flicker", &[Thunder, Wind], 25.0, 6000, 0, Buff, 0xccccff)
            .buff(B::Speed, 5000, 100),
        Jutsu::entry("chakra_armor", "Chakra Armor", &[Earth, Earth], 45.0, 18000, 0, Buff, 0x8b8b00)
            .buff(B::Defense, 12000, 75),
        Jutsu::entry("chidori_blade", "Lightning Style: Chidori Spear", &[Thunder, Earth], 55.0, 4500, 75, Projectile, 0x66ffff)
            .boss_bonus(80),
        Jutsu::entry("rasengan_barrage", "Rasengan Barrage", &[Wind, Fire], 65.0, 5000, 120, Area, 0x00aaff)
            .boss_bonus(60),
        // Forbidden
        Jutsu::entry("edo_tensei", "Reanimation Release", &[Earth, Fire, Water, Thunder], 150.0, 30000, 500, Forbidden, 0x4a0080)
            .boss_bonus(300)
            .radius(15.0),
        Jutsu::entry("shinra_tensei", "Almighty Push", &[Wind, Fire, Thunder, Earth], 120.0, 25000, 400, Forbidden, 0x000033)
            .boss_bonus(200)
            .radius(20.0),
        Jutsu::entry("chibaku_tensei", "Planetary Devastation", &[Earth, Earth, Thunder, Fire], 180.0, 40000, 600, Forbidden, 0x1a1a2e)
            .boss_bonus(400)
            .radius(25.0),
        Jutsu::entry("tsukuyomi", "Tsukuyomi", &[Fire, Thunder, Water, Earth], 130.0, 35000, 0, Debuff, 0x6600cc)
            .buff(B::Invincible, 5000, 100),
        // Advanced
        Jutsu::entry("water_shark_dance", "Water Style: Shark Dance", &[Water, Water, Thunder], 70.0, 7000, 150, Area, 0x0077be)
            .radius(8.0),
        Jutsu::entry("fire_dragon_flame", "Fire Style: Dragon Flame Roar", &[Fire, Wind, Fire], 75.0, 7500, 160, Projectile, 0xff3300)
            .boss_bonus(100)
            .crit(30),
        Jutsu::entry("lightning_armor", "Lightning Style: Armor", &[Thunder, Thunder, Earth], 65.0, 20000, 0, Buff, 0x00ccff)
            .buff(B::Invincible, 8000, 80),
        Jutsu::entry("healing_palm", "Mystical Palm", &[Water, Fire], 40.0, 20000, 0, Buff, 0x00ff99)
            .buff(B::Lifesteal, 15000, 25),
        Jutsu::entry("critical_focus", "Sharingan Insight", &[Thunder, Fire], 35.0, 25000, 0, Buff, 0xff0000)
            .buff(B::Critical, 12000, 50),
        Jutsu::entry("combo_master", "Combo Mastery", &[Wind, Thunder, Wind], 50.0, 30000, 0, Buff, 0xffcc00)
            .buff(B::Combo, 20000, 100),
        // Wind
        Jutsu::entry("wind_devastation", "Wind Style: Dust Whirlwind", &[Wind, Wind, Wind], 85.0, 12000, 180, Area, 0x98fb98)
            .radius(12.0),
        Jutsu::entry("wind_vacuum", "Wind Style: Vacuum Wave", &[Wind, Earth], 40.0, 4000, 55, Projectile, 0xc0ffc0)
            .boss_bonus(25),
        Jutsu::entry("wind_gale_palace", "Wind Style: Gale Palm", &[Wind, Thunder, Earth], 70.0, 8000, 120, Area, 0x7fff00)
            .boss_bonus(50)
            .radius(10.0),
        // Earth
        Jutsu::entry("earth_swamp", "Earth Style: Swamp of the Underworld", &[Earth, Water], 45.0, 10000, 30, Debuff, 0x556b2f)
            .buff(B::Speed, 8000, -50)
            .radius(15.0),
        Jutsu::entry("earth_mountain", "Earth Style: Moving Earth Core", &[Earth, Earth, Earth], 80.0, 15000, 200, Area, 0x8b4513)
            .boss_bonus(100)
            .radius(18.0),
        Jutsu::entry("earth_dragon_bullet", "Earth Style: Earth Dragon Bullet", &[Earth, Fire, Earth], 60.0, 7000, 100, Projectile, 0xd2691e)
            .boss_bonus(60)
            .radius(5.0),
        Jutsu::entry("earth_shield_ultimate", "Earth Style: Great Earth Shield", &[Earth, Wind, Earth], 55.0, 20000, 0, Shield, 0xdaa520)
            .buff(B::Defense, 15000, 90),
        Jutsu::entry("dust_storm", "Dust Release: Detachment of the Primitive World", &[Wind, Earth, Wind, Earth], 100.0, 20000, 350, Ultimate, 0xfff8dc)
            .boss_bonus(150)
            .radius(20.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use SealSymbol::*;

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = JutsuCatalog::standard();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.len(), 36);
    }

    #[test]
    fn test_catalog_ordered_longest_first() {
        let catalog = JutsuCatalog::standard();
        let lens: Vec<usize> = catalog.iter().map(|j| j.seals.len()).collect();
        assert!(lens.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_exact_match_only() {
        let catalog = JutsuCatalog::standard();

        let fireball = catalog.match_jutsu(&[Fire]).unwrap();
        assert_eq!(fireball.id, "fireball");
        assert_eq!(fireball.damage, 30);
        assert_eq!(fireball.chakra_cost, 20.0);

        // Unregistered pair, even though [fire] alone matches
        assert!(catalog.match_jutsu(&[Fire, Water]).is_none());
        assert!(catalog.match_jutsu(&[]).is_none());
    }

    #[test]
    fn test_combo_preferred_and_order_sensitive() {
        let catalog = JutsuCatalog::standard();
        let combo = catalog.match_jutsu(&[Fire, Thunder]).unwrap();
        assert_eq!(combo.id, "fire_thunder_combo");
        assert_eq!(combo.damage, 80);

        let reversed = catalog.match_jutsu(&[Thunder, Fire]).unwrap();
        assert_eq!(reversed.id, "critical_focus");
    }

    #[test]
    fn test_has_extension() {
        let catalog = JutsuCatalog::standard();
        assert!(catalog.has_extension(&[Fire], 3));
        assert!(catalog.has_extension(&[], 3));
        // Only tsukuyomi continues Fire, Thunder, and it needs four seals
        assert!(!catalog.has_extension(&[Fire, Thunder], 3));
        assert!(catalog.has_extension(&[Fire, Thunder], 4));
        assert!(!catalog.has_extension(&[Fire, Fire, Fire], 4));
    }

    #[test]
    fn test_validation_errors() {
        let base = Jutsu::entry("a", "A", &[Fire], 10.0, 1000, 1, EffectType::Projectile, 0);

        let mut empty = base.clone();
        empty.seals.clear();
        assert_eq!(
            JutsuCatalog::new(vec![empty]).unwrap_err(),
            CatalogError::EmptySeals { id: "a".into() }
        );

        let mut long = base.clone();
        long.seals = vec![Fire; 5];
        assert!(matches!(
            JutsuCatalog::new(vec![long]).unwrap_err(),
            CatalogError::TooManySeals { len: 5, .. }
        ));

        let mut same_seals = base.clone();
        same_seals.id = "b".into();
        assert!(matches!(
            JutsuCatalog::new(vec![base.clone(), same_seals]).unwrap_err(),
            CatalogError::DuplicateSequence { .. }
        ));

        let mut same_id = base.clone();
        same_id.seals = vec![Water];
        assert_eq!(
            JutsuCatalog::new(vec![base, same_id]).unwrap_err(),
            CatalogError::DuplicateId { id: "a".into() }
        );

        assert_eq!(JutsuCatalog::new(Vec::new()).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"[
            { "id": "spark", "name": "Spark", "seals": ["thunder"], "chakra_cost": 5.0,
              "cooldown": 0.5, "damage": 12, "effect": "projectile" },
            { "id": "gust", "name": "Gust", "seals": ["wind", "wind"], "chakra_cost": 8.0,
              "cooldown": 1.0, "damage": 0, "effect": "buff",
              "buff": { "kind": "Speed", "duration": 2.0, "magnitude": 40 } }
        ]"#;
        let catalog = JutsuCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.iter().next().unwrap().id, "gust");
        assert_eq!(catalog.match_jutsu(&[Thunder]).unwrap().reach(), HIT_RADIUS);

        let dup = r#"[
            { "id": "x", "name": "X", "seals": ["fire"], "chakra_cost": 1.0,
              "cooldown": 0.0, "damage": 1, "effect": "area" },
            { "id": "x", "name": "X", "seals": ["water"], "chakra_cost": 1.0,
              "cooldown": 0.0, "damage": 1, "effect": "area" }
        ]"#;
        assert!(matches!(
            JutsuCatalog::from_json(dup).unwrap_err(),
            ConfigError::Catalog(CatalogError::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_release_leaves_input_untouched() {
        let catalog = JutsuCatalog::standard();
        let fireball = catalog.get("fireball").unwrap();
        let chakra = Chakra::full(100.0);

        assert!(can_release_jutsu(&chakra, fireball));
        let after = release_jutsu(&chakra, fireball);
        assert_eq!(after.current, 80.0);
        assert_eq!(after.max, 100.0);
        assert_eq!(chakra, Chakra::full(100.0));
    }

    #[test]
    fn test_can_release_boundary() {
        let catalog = JutsuCatalog::standard();
        let fireball = catalog.get("fireball").unwrap();

        let exact = Chakra { current: 20.0, max: 100.0 };
        assert!(can_release_jutsu(&exact, fireball));

        let short = Chakra { current: 19.9, max: 100.0 };
        assert!(!can_release_jutsu(&short, fireball));
    }

    proptest! {
        #[test]
        fn prop_release_never_negative(current in 0.0f32..500.0, cost in 0.0f32..10_000.0) {
            let mut jutsu = Jutsu::entry("x", "X", &[Fire], cost, 0, 0, EffectType::Projectile, 0);
            jutsu.chakra_cost = cost;
            let chakra = Chakra { current, max: 500.0 };
            let after = release_jutsu(&chakra, &jutsu);
            prop_assert!(after.current >= 0.0);
            prop_assert_eq!(after.max, 500.0);
            prop_assert_eq!(chakra.current, current);
        }
    }
}
