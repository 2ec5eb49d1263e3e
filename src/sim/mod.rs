//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, stored in the state
//! - Stable iteration order (spawn / release order)
//! - No rendering, audio or platform dependencies

pub mod boss;
pub mod buffs;
pub mod collision;
pub mod enemy;
pub mod events;
pub mod jutsu;
pub mod mastery;
pub mod rules;
pub mod score;
pub mod seals;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod wave;

pub use boss::{Aggressive, BossBrain, BossKind, FirstReady, create_boss};
pub use buffs::{BuffKind, Buffs};
pub use collision::{ScreenShake, apply_damage, is_colliding, mitigate, screen_shake};
pub use enemy::{Enemy, EnemyKind, create_enemy, create_split_enemies, create_summoned_enemies};
pub use events::{CastRejection, EventSink, GameEvent, NullSink};
pub use jutsu::{Chakra, EffectType, Jutsu, JutsuCatalog, can_release_jutsu, release_jutsu};
pub use mastery::{JutsuMastery, Mastery};
pub use rules::Rules;
pub use score::Combo;
pub use seals::{GestureLabel, SealSequence, SealSymbol};
pub use spawner::EnemySpawner;
pub use state::{GamePhase, GameState, JutsuInstance, SessionStats};
pub use tick::{TickInput, tick};
pub use wave::{WaveConfig, wave_config};
