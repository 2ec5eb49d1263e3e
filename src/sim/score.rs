//! Combo, score and wave-progress arithmetic
//!
//! Score math runs in integer percent so a float rounding error can never
//! cost the player a point.

use serde::{Deserialize, Serialize};

use super::wave::wave_config;
use crate::tuning::Tuning;

/// Consecutive-hit counter and its decay timer. The two always move together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    pub count: u32,
    /// Seconds until the combo drops
    pub timer: f32,
}

impl Combo {
    /// Count a hit and restart the window
    pub fn hit(&mut self, window: f32) -> u32 {
        self.count += 1;
        self.timer = window;
        self.count
    }

    /// Count down; returns the combo that was lost if the window ran out
    pub fn decay(&mut self, dt: f32) -> Option<u32> {
        if self.count == 0 {
            return None;
        }
        self.timer -= dt;
        if self.timer <= 0.0 {
            let lost = self.count;
            self.reset();
            return Some(lost);
        }
        None
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.timer = 0.0;
    }
}

/// Bonus for reaching exactly `combo`
pub fn milestone_bonus(tuning: &Tuning, combo: u32) -> Option<u64> {
    tuning
        .combo_milestones
        .iter()
        .find(|(at, _)| *at == combo)
        .map(|(_, bonus)| *bonus)
}

/// Points for a hit at `combo` (post-increment) during `wave`.
///
/// `floor(base * combo * (1 + wave * rate) * score_percent / 100)`, with the
/// milestone bonus returned separately.
pub fn hit_score(tuning: &Tuning, combo: u32, wave: u32, score_percent: u64) -> (u64, Option<u64>) {
    let wave_percent = 100 + wave as u64 * tuning.wave_bonus_percent;
    let base = tuning.base_hit_score * combo as u64 * wave_percent * score_percent / 10_000;
    (base, milestone_bonus(tuning, combo))
}

/// Kills needed to leave `wave`
pub fn kills_to_advance(tuning: &Tuning, wave: u32) -> u32 {
    wave_config(wave)
        .enemy_count
        .min(tuning.kills_per_wave)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_hit_score() {
        let tuning = Tuning::default();
        assert_eq!(hit_score(&tuning, 1, 1, 100), (110, None));
        assert_eq!(hit_score(&tuning, 3, 4, 100), (420, None));
    }

    #[test]
    fn test_milestone_only_on_exact_combo() {
        let tuning = Tuning::default();
        assert_eq!(hit_score(&tuning, 10, 1, 100), (1100, Some(500)));
        assert_eq!(hit_score(&tuning, 11, 1, 100), (1210, None));
        assert_eq!(milestone_bonus(&tuning, 25), Some(1500));
        assert_eq!(milestone_bonus(&tuning, 50), Some(5000));
    }

    #[test]
    fn test_combo_buff_scales_hit_part() {
        let tuning = Tuning::default();
        assert_eq!(hit_score(&tuning, 1, 1, 200), (220, None));
    }

    #[test]
    fn test_combo_decays_with_timer() {
        let mut combo = Combo::default();
        assert_eq!(combo.decay(1.0), None);

        combo.hit(3.0);
        assert_eq!(combo.count, 1);
        assert_eq!(combo.timer, 3.0);

        let mut lost = None;
        for _ in 0..31 {
            assert_eq!(combo.count, 1);
            lost = combo.decay(0.1);
            if lost.is_some() {
                break;
            }
        }
        assert_eq!(lost, Some(1));
        assert_eq!(combo.count, 0);
        assert_eq!(combo.timer, 0.0);
    }

    #[test]
    fn test_kills_to_advance() {
        let tuning = Tuning::default();
        assert_eq!(kills_to_advance(&tuning, 1), 5);
        // Boss wave: a single enemy
        assert_eq!(kills_to_advance(&tuning, 5), 1);
    }
}
