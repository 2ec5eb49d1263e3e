//! Per-wave difficulty parameters

use serde::{Deserialize, Serialize};

/// Baseline stats for enemies of one wave
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    pub enemy_count: u32,
    /// Units per second toward the defeat line
    pub speed: f32,
    pub health: u32,
    /// Seconds between spawns
    pub interval: f32,
    pub size: f32,
}

impl WaveConfig {
    const fn new(enemy_count: u32, speed: f32, health: u32, interval: f32, size: f32) -> Self {
        Self {
            enemy_count,
            speed,
            health,
            interval,
            size,
        }
    }
}

/// Hand-tuned opening waves; 5 and 10 are boss waves
const WAVE_TABLE: [WaveConfig; 10] = [
    WaveConfig::new(10, 5.0, 1, 2.0, 1.0),
    WaveConfig::new(15, 6.0, 1, 1.5, 1.0),
    WaveConfig::new(20, 7.0, 2, 1.5, 1.2),
    WaveConfig::new(25, 8.0, 2, 1.0, 1.2),
    WaveConfig::new(1, 2.0, 50, 10.0, 5.0),
    WaveConfig::new(30, 8.0, 3, 0.8, 1.3),
    WaveConfig::new(35, 9.0, 3, 0.7, 1.3),
    WaveConfig::new(40, 9.0, 4, 0.6, 1.4),
    WaveConfig::new(45, 10.0, 4, 0.5, 1.4),
    WaveConfig::new(1, 1.5, 100, 10.0, 6.0),
];

/// Shortest spawn interval the formula produces
pub const MIN_SPAWN_INTERVAL: f32 = 0.5;

/// Wave parameters. Total: wave 0 reads as wave 1, waves past the table use
/// the growth formula.
pub fn wave_config(wave: u32) -> WaveConfig {
    let wave = wave.max(1);
    if let Some(config) = WAVE_TABLE.get(wave as usize - 1) {
        return *config;
    }

    let w = wave as f32;
    WaveConfig {
        enemy_count: 10 + (wave - 1) * 5,
        speed: 5.0 + (w - 1.0),
        health: wave / 2,
        interval: (2.0 - 0.1 * w).max(MIN_SPAWN_INTERVAL),
        size: 1.0 + 0.1 * (w - 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_table_entries_verbatim() {
        assert_eq!(wave_config(1), WaveConfig::new(10, 5.0, 1, 2.0, 1.0));
        assert_eq!(wave_config(5).health, 50);
        assert_eq!(wave_config(10).size, 6.0);
        // Wave 0 is clamped to wave 1
        assert_eq!(wave_config(0), wave_config(1));
    }

    #[test]
    fn test_formula_past_table() {
        let w11 = wave_config(11);
        assert_eq!(w11.enemy_count, 60);
        assert_eq!(w11.speed, 15.0);
        assert_eq!(w11.health, 5);
        assert!((w11.interval - 0.9).abs() < 1e-5);
        assert!((w11.size - 2.0).abs() < 1e-5);

        assert_eq!(wave_config(40).interval, MIN_SPAWN_INTERVAL);
    }

    proptest! {
        #[test]
        fn prop_formula_monotonic(wave in 11u32..5000) {
            let a = wave_config(wave);
            let b = wave_config(wave + 1);
            prop_assert!(b.enemy_count >= a.enemy_count);
            prop_assert!(b.speed >= a.speed);
            prop_assert!(b.health >= a.health);
            prop_assert!(b.size >= a.size);
            prop_assert!(b.interval <= a.interval);
            prop_assert!(b.interval >= MIN_SPAWN_INTERVAL);
        }
    }
}
