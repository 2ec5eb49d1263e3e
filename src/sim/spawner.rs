//! Timer-driven enemy spawner

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, create_enemy};
use super::wave::{WaveConfig, wave_config};

/// Emits one enemy every wave interval. Callers gate spawning on both
/// `should_spawn` and `can_spawn`; `spawn` itself enforces nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawner {
    wave: u32,
    timer: f32,
    config: WaveConfig,
    max_count: usize,
    /// Difficulty multiplier on spawned health
    health_scale: f32,
}

impl Default for EnemySpawner {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

impl EnemySpawner {
    pub fn new(wave: u32, max_count: usize) -> Self {
        let wave = wave.max(1);
        Self {
            wave,
            timer: 0.0,
            config: wave_config(wave),
            max_count,
            health_scale: 1.0,
        }
    }

    pub fn with_health_scale(mut self, scale: f32) -> Self {
        self.health_scale = scale;
        self
    }

    pub fn update(&mut self, dt: f32) {
        self.timer += dt;
    }

    pub fn should_spawn(&self) -> bool {
        self.timer >= self.config.interval
    }

    /// True while the live count is under the cap
    pub fn can_spawn(&self, enemies: &[Enemy]) -> bool {
        enemies.len() < self.max_count
    }

    /// Reset the timer and build one enemy for the current wave
    pub fn spawn<R: Rng + ?Sized>(&mut self, id: u32, rng: &mut R) -> Enemy {
        self.timer = 0.0;
        let mut enemy = create_enemy(id, self.wave, None, rng);
        if self.health_scale != 1.0 {
            enemy.scale_health(self.health_scale);
        }
        enemy
    }

    pub fn next_wave(&mut self) {
        self.set_wave(self.wave + 1);
    }

    pub fn set_wave(&mut self, wave: u32) {
        self.wave = wave.max(1);
        self.config = wave_config(self.wave);
        self.timer = 0.0;
    }

    /// Stop the clock (teardown)
    pub fn reset(&mut self) {
        self.timer = 0.0;
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_gating_by_count() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut spawner = EnemySpawner::new(1, 2);
        let one = vec![spawner.spawn(1, &mut rng)];
        let two = vec![spawner.spawn(1, &mut rng), spawner.spawn(2, &mut rng)];

        assert!(spawner.can_spawn(&one));
        assert!(!spawner.can_spawn(&two));
    }

    #[test]
    fn test_timer_and_spawn_reset() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut spawner = EnemySpawner::new(1, 10);
        assert!(!spawner.should_spawn());

        spawner.update(1.0);
        assert!(!spawner.should_spawn());
        spawner.update(1.0);
        assert!(spawner.should_spawn());

        let enemy = spawner.spawn(7, &mut rng);
        assert_eq!(enemy.id, 7);
        assert_eq!(enemy.wave, 1);
        assert_eq!(spawner.timer(), 0.0);
        assert!(!spawner.should_spawn());
    }

    #[test]
    fn test_next_wave_reloads_config() {
        let mut spawner = EnemySpawner::new(1, 10);
        spawner.update(1.5);
        spawner.next_wave();

        assert_eq!(spawner.wave(), 2);
        assert_eq!(spawner.config().interval, 1.5);
        assert_eq!(spawner.timer(), 0.0);
    }

    #[test]
    fn test_health_scale_applied_at_spawn() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut spawner = EnemySpawner::new(3, 10).with_health_scale(3.0);
        let enemy = spawner.spawn(1, &mut rng);
        assert!(enemy.max_health >= 3);
        assert_eq!(enemy.health, enemy.max_health);
    }
}
