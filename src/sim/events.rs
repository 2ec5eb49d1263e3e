//! Discrete gameplay events for the audio, VFX and UI collaborators

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::boss::{BossKind, SkillEffect};
use super::buffs::BuffKind;
use super::enemy::EnemyKind;
use super::jutsu::EffectType;
use super::seals::SealSymbol;

/// Why a release attempt did nothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CastRejection {
    NoMatch,
    InsufficientChakra { needed: f32, available: f32 },
    OnCooldown { remaining: f32 },
}

/// Something the simulation did this tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    SealFormed {
        seal: SealSymbol,
        sequence_len: usize,
    },
    /// Buffer full; the seal was dropped
    SealIgnored {
        seal: SealSymbol,
    },
    JutsuReleased {
        jutsu_id: String,
        effect: EffectType,
        instance_id: u32,
        chakra_left: f32,
    },
    CastRejected {
        jutsu_id: Option<String>,
        #[serde(flatten)]
        rejection: CastRejection,
    },
    EnemySpawned {
        enemy_id: u32,
        kind: EnemyKind,
    },
    BossSpawned {
        enemy_id: u32,
        boss: BossKind,
        wave: u32,
    },
    EnemyHit {
        enemy_id: u32,
        jutsu_id: String,
        damage: u32,
        critical: bool,
        combo: u32,
        score_gain: u64,
        shake_amplitude: f32,
        shake_duration: f32,
    },
    EnemyKilled {
        enemy_id: u32,
        kind: EnemyKind,
        position: Vec3,
        color: u32,
    },
    Exploded {
        enemy_id: u32,
        position: Vec3,
        damage: u32,
        radius: f32,
    },
    EnemySplit {
        parent_id: u32,
        children: u32,
    },
    EnemiesSummoned {
        summoner_id: u32,
        count: u32,
    },
    BossSkillUsed {
        boss_id: u32,
        skill_id: String,
        effect: SkillEffect,
        damage: u32,
        range: Option<f32>,
    },
    Breach {
        enemy_id: u32,
        /// A defensive buff absorbed it
        blocked: bool,
        lives_left: u8,
    },
    ComboMilestone {
        combo: u32,
        bonus: u64,
    },
    ComboLost {
        combo: u32,
    },
    WaveAdvanced {
        wave: u32,
    },
    BuffApplied {
        kind: BuffKind,
        duration: f32,
        magnitude: i32,
    },
    BuffExpired {
        kind: BuffKind,
    },
    /// A jutsu gained enough mastery experience for a new level
    JutsuLevelUp {
        jutsu_id: String,
        level: u32,
    },
    Paused,
    Resumed,
    Restarted,
    GameOver {
        score: u64,
        wave: u32,
    },
}

/// Receives events as the tick produces them
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects_in_order() {
        let mut events: Vec<GameEvent> = Vec::new();
        events.emit(GameEvent::WaveAdvanced { wave: 2 });
        events.emit(GameEvent::Paused);
        assert_eq!(events, vec![GameEvent::WaveAdvanced { wave: 2 }, GameEvent::Paused]);

        NullSink.emit(GameEvent::Resumed);
    }

    #[test]
    fn test_events_serialize_tagged() {
        let json = serde_json::to_string(&GameEvent::CastRejected {
            jutsu_id: Some("amaterasu".into()),
            rejection: CastRejection::InsufficientChakra {
                needed: 100.0,
                available: 40.0,
            },
        })
        .unwrap();
        assert!(json.contains(r#""type":"cast_rejected""#));
        assert!(json.contains(r#""reason":"insufficient_chakra""#));
    }
}
