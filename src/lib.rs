//! Seal Clash - hand-seal jutsu combat simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (seals, jutsu, waves, combat, scoring)
//! - `tuning`: Data-driven game balance and difficulty presets
//! - `settings`: Player preferences
//! - `stats` / `highscores`: Plain-data snapshots for the save collaborator
//! - `achievements`: Unlock checks over lifetime stats and jutsu mastery
//! - `web`: wasm32 binding for the browser shell

pub mod achievements;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod stats;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use achievements::{Achievement, Achievements};
pub use error::{CatalogError, ConfigError};
pub use highscores::HighScores;
pub use settings::Settings;
pub use stats::{PlayerStats, SessionSummary};
pub use tuning::{Difficulty, Tuning};

use glam::{Vec2, Vec3};

/// World geometry constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Enemies enter from this x coordinate
    pub const SPAWN_EDGE_X: f32 = 15.0;
    /// Vertical spread of the spawn edge (y in [-spread/2, spread/2])
    pub const SPAWN_SPREAD_Y: f32 = 10.0;
    /// Enemies crossing this x coordinate breach the player's line
    pub const DEFEAT_LINE_X: f32 = -15.0;
    /// Height at which flying enemies travel
    pub const FLYING_ALTITUDE: f32 = 2.0;
    /// Amplitude of a flying enemy's vertical drift
    pub const FLYING_DRIFT: f32 = 2.0;

    /// Half extents of the aimable playfield (z = 0 plane)
    pub const PLAYFIELD_HALF_WIDTH: f32 = 12.0;
    pub const PLAYFIELD_HALF_HEIGHT: f32 = 8.0;

    /// Projectiles leave from the camera side of the scene
    pub const CAST_ORIGIN: Vec3 = Vec3::new(0.0, 0.0, 8.0);
    /// Projectile speed (units/s)
    pub const JUTSU_SPEED: f32 = 10.0;
    /// Projectile lifetime (seconds)
    pub const JUTSU_LIFETIME: f32 = 3.0;

    /// Default hit distance between a projectile and an enemy
    pub const HIT_RADIUS: f32 = 1.0;

    /// Split children are placed on this radius around the parent
    pub const SPLIT_RADIUS: f32 = 0.5;
    /// Summoned minions are placed on this radius around the summoner
    pub const SUMMON_RADIUS: f32 = 2.0;

    /// Bosses enter at the middle of the spawn edge
    pub const BOSS_SPAWN: Vec3 = Vec3::new(SPAWN_EDGE_X, 0.0, 0.0);
}

/// Map a normalized hand position ([0,1]², y down) onto the z = 0 playfield
#[inline]
pub fn aim_to_world(aim: Vec2) -> Vec3 {
    let aim = aim.clamp(Vec2::ZERO, Vec2::ONE);
    Vec3::new(
        (aim.x * 2.0 - 1.0) * consts::PLAYFIELD_HALF_WIDTH,
        (1.0 - aim.y * 2.0) * consts::PLAYFIELD_HALF_HEIGHT,
        0.0,
    )
}

/// Point on a ring of `radius` around `center`, `index` of `count` evenly spaced
#[inline]
pub fn ring_offset(index: u32, count: u32, radius: f32) -> (f32, Vec3) {
    let angle = (index as f32 / count.max(1) as f32) * std::f32::consts::TAU;
    (angle, Vec3::new(angle.cos() * radius, angle.sin() * radius, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aim_to_world_corners() {
        let center = aim_to_world(Vec2::new(0.5, 0.5));
        assert!(center.length() < 0.0001);

        let top_left = aim_to_world(Vec2::new(0.0, 0.0));
        assert!((top_left.x + consts::PLAYFIELD_HALF_WIDTH).abs() < 0.0001);
        assert!((top_left.y - consts::PLAYFIELD_HALF_HEIGHT).abs() < 0.0001);

        // Out of range input is clamped
        let clamped = aim_to_world(Vec2::new(4.0, -3.0));
        assert!((clamped.x - consts::PLAYFIELD_HALF_WIDTH).abs() < 0.0001);
    }

    #[test]
    fn test_ring_offset_is_on_radius() {
        for i in 0..3 {
            let (_, offset) = ring_offset(i, 3, 0.5);
            assert!((offset.length() - 0.5).abs() < 0.0001);
        }
    }
}
