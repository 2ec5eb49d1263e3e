//! Timed player buffs granted by support jutsu

use serde::{Deserialize, Serialize};

use super::jutsu::BuffSpec;

/// What a buff modifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuffKind {
    /// Hit damage
    Attack,
    /// Absorbs breaches
    Defense,
    /// Combo window when positive, enemy speed when negative
    Speed,
    /// Chakra regeneration
    Chakra,
    /// Per-hit score
    Combo,
    /// Extra critical chance
    Critical,
    /// Chakra refunded from damage dealt
    Lifesteal,
    /// Absorbs breaches
    Invincible,
}

impl BuffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuffKind::Attack => "attack",
            BuffKind::Defense => "defense",
            BuffKind::Speed => "speed",
            BuffKind::Chakra => "chakra",
            BuffKind::Combo => "combo",
            BuffKind::Critical => "critical",
            BuffKind::Lifesteal => "lifesteal",
            BuffKind::Invincible => "invincible",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveBuff {
    pub kind: BuffKind,
    /// Seconds left
    pub remaining: f32,
    /// Percent; negative entries are debuffs on enemies
    pub magnitude: i32,
}

impl ActiveBuff {
    fn is_debuff(&self) -> bool {
        self.magnitude < 0
    }
}

/// All buffs currently running
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Buffs {
    active: Vec<ActiveBuff>,
}

impl Buffs {
    /// Start a buff, or refresh the running one of the same kind and sign
    pub fn apply(&mut self, spec: &BuffSpec) {
        let debuff = spec.magnitude < 0;
        if let Some(existing) = self
            .active
            .iter_mut()
            .find(|b| b.kind == spec.kind && b.is_debuff() == debuff)
        {
            existing.remaining = existing.remaining.max(spec.duration);
            existing.magnitude = spec.magnitude;
            return;
        }
        self.active.push(ActiveBuff {
            kind: spec.kind,
            remaining: spec.duration,
            magnitude: spec.magnitude,
        });
    }

    /// Count down and drop finished buffs, returning the kinds that ended
    pub fn tick(&mut self, dt: f32) -> Vec<BuffKind> {
        let mut expired = Vec::new();
        for buff in &mut self.active {
            buff.remaining -= dt;
            if buff.remaining <= 0.0 {
                expired.push(buff.kind);
            }
        }
        self.active.retain(|b| b.remaining > 0.0);
        expired
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn active(&self) -> &[ActiveBuff] {
        &self.active
    }

    pub fn is_active(&self, kind: BuffKind) -> bool {
        self.active.iter().any(|b| b.kind == kind)
    }

    /// Strongest positive magnitude of `kind`, 0 when none
    pub fn boost(&self, kind: BuffKind) -> u32 {
        self.active
            .iter()
            .filter(|b| b.kind == kind && !b.is_debuff())
            .map(|b| b.magnitude as u32)
            .max()
            .unwrap_or(0)
    }

    /// Strongest negative magnitude of `kind` as a positive percent, 0 when none
    pub fn penalty(&self, kind: BuffKind) -> u32 {
        self.active
            .iter()
            .filter(|b| b.kind == kind && b.is_debuff())
            .map(|b| b.magnitude.unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// Hit damage in percent of base
    pub fn damage_percent(&self) -> u32 {
        100 + self.boost(BuffKind::Attack)
    }

    pub fn regen_scale(&self) -> f32 {
        1.0 + self.boost(BuffKind::Chakra) as f32 / 100.0
    }

    pub fn combo_window_scale(&self) -> f32 {
        1.0 + self.boost(BuffKind::Speed) as f32 / 100.0
    }

    /// Enemy movement multiplier from slowing debuffs
    pub fn enemy_speed_scale(&self) -> f32 {
        (1.0 - self.penalty(BuffKind::Speed) as f32 / 100.0).max(0.0)
    }

    /// Per-hit score in percent of base
    pub fn score_percent(&self) -> u64 {
        100 + self.boost(BuffKind::Combo) as u64
    }

    pub fn crit_bonus(&self) -> u32 {
        self.boost(BuffKind::Critical)
    }

    pub fn lifesteal_percent(&self) -> u32 {
        self.boost(BuffKind::Lifesteal)
    }

    /// A breaching enemy costs no life
    pub fn blocks_breach(&self) -> bool {
        self.boost(BuffKind::Defense) > 0 || self.boost(BuffKind::Invincible) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(kind: BuffKind, duration: f32, magnitude: i32) -> BuffSpec {
        BuffSpec {
            kind,
            duration,
            magnitude,
        }
    }

    #[test]
    fn test_apply_and_expire() {
        let mut buffs = Buffs::default();
        buffs.apply(&spec(BuffKind::Attack, 1.0, 50));
        assert_eq!(buffs.damage_percent(), 150);

        assert!(buffs.tick(0.6).is_empty());
        assert!(buffs.is_active(BuffKind::Attack));

        let expired = buffs.tick(0.5);
        assert_eq!(expired, vec![BuffKind::Attack]);
        assert_eq!(buffs.damage_percent(), 100);
        assert!(buffs.active().is_empty());
    }

    #[test]
    fn test_refresh_keeps_single_entry() {
        let mut buffs = Buffs::default();
        buffs.apply(&spec(BuffKind::Defense, 5.0, 50));
        buffs.tick(4.0);
        buffs.apply(&spec(BuffKind::Defense, 5.0, 75));

        assert_eq!(buffs.active().len(), 1);
        assert_eq!(buffs.active()[0].remaining, 5.0);
        assert_eq!(buffs.boost(BuffKind::Defense), 75);
        assert!(buffs.blocks_breach());
    }

    #[test]
    fn test_speed_buff_and_slow_debuff_coexist() {
        let mut buffs = Buffs::default();
        buffs.apply(&spec(BuffKind::Speed, 5.0, 100));
        buffs.apply(&spec(BuffKind::Speed, 8.0, -50));

        assert_eq!(buffs.active().len(), 2);
        assert_eq!(buffs.combo_window_scale(), 2.0);
        assert_eq!(buffs.enemy_speed_scale(), 0.5);
        assert!(!buffs.blocks_breach());
    }
}
