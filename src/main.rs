//! Seal Clash headless runner
//!
//! Plays a seeded run with a simple autopilot and prints the results.
//! The browser build uses the `web` module of the library instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use seal_clash::consts::SIM_DT;
    use seal_clash::sim::{Aggressive, GameEvent, GameState, Rules, TickInput, tick};
    use seal_clash::{Achievements, Difficulty, HighScores, PlayerStats, SessionSummary, Settings};

    /// Give up after this much simulated time
    const TIME_LIMIT: f32 = 600.0;
    /// Seconds between autopilot decisions
    const DECISION_INTERVAL: f32 = 0.4;

    /// Picks the hardest hitting jutsu that can be released right now
    fn choose_cast(state: &GameState, rules: &Rules) -> Option<TickInput> {
        if state.enemies.iter().all(|e| !e.can_be_hit()) {
            return None;
        }
        let jutsu = rules
            .catalog
            .iter()
            .filter(|j| j.damage > 0 && j.seals.len() <= rules.tuning.max_seals)
            .filter(|j| j.chakra_cost <= state.chakra.current)
            .filter(|j| state.cooldown_remaining(&j.id) <= 0.0)
            .max_by_key(|j| j.damage)?;

        Some(TickInput {
            seals: jutsu.seals.clone(),
            clear_seals: true,
            release: true,
            ..Default::default()
        })
    }

    pub fn run(seed: u64, difficulty: Difficulty) {
        let settings = Settings {
            difficulty,
            ..Default::default()
        };
        let rules = Rules {
            tuning: settings.tuning(),
            ..Default::default()
        }
        .with_boss_brain(Aggressive);
        let mut state = GameState::new(seed, &rules.tuning);
        let mut events: Vec<GameEvent> = Vec::new();

        log::info!("Autoplay run (seed {}, difficulty {})", seed, difficulty.as_str());

        let mut decision_timer = 0.0;
        while !state.is_game_over() && state.elapsed < TIME_LIMIT {
            decision_timer -= SIM_DT;
            let input = if decision_timer <= 0.0 {
                decision_timer = DECISION_INTERVAL;
                choose_cast(&state, &rules).unwrap_or_default()
            } else {
                TickInput::default()
            };
            tick(&mut state, &rules, &input, SIM_DT, &mut events);
        }

        let rejected = events
            .iter()
            .filter(|e| matches!(e, GameEvent::CastRejected { .. }))
            .count();
        log::info!("{} events, {} rejected casts", events.len(), rejected);

        let summary = SessionSummary::from_state(&state, difficulty);
        let mut stats = PlayerStats::default();
        stats.record(&summary);
        let mut scores = HighScores::new();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0);
        scores.add_score(&summary, timestamp);
        let mut achievements = Achievements::default();
        let unlocked = achievements.check(&stats, &state.mastery, timestamp);

        println!(
            "Seed {} on {}: score {}, wave {}, max combo {}, {} kills ({} bosses) in {:.1}s",
            seed,
            difficulty.as_str(),
            summary.score,
            summary.wave,
            summary.max_combo,
            summary.kills,
            summary.boss_kills,
            summary.elapsed,
        );
        if let Some(favorite) = summary.favorite_jutsu() {
            println!("Favorite jutsu: {}", favorite);
        }
        for achievement in &unlocked {
            println!("Achievement: {} ({})", achievement.name, achievement.description);
        }
        for (id, mastery) in state.mastery.iter().filter(|(_, m)| m.level > 1) {
            println!("Mastery: {} level {} ({} exp)", id, mastery.level, mastery.experience);
        }
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(err) => log::warn!("Could not serialize summary: {}", err),
        }
        match stats.to_json() {
            Ok(json) => println!("{}", json),
            Err(err) => log::warn!("Could not serialize stats: {}", err),
        }
        println!("{}", scores.to_json());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    // Usage: seal-clash [seed] [difficulty]
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let difficulty = args
        .next()
        .and_then(|s| seal_clash::Difficulty::from_str(&s))
        .unwrap_or_default();

    headless::run(seed, difficulty);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::start` in the library
}
