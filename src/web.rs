//! Browser binding
//!
//! The page owns the camera, the gesture recognizer and the canvas. It feeds
//! recognized gestures in and reads back events and state snapshots as JSON.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::achievements::Achievements;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, GestureLabel, Mastery, Rules, SealSymbol, TickInput, tick};
use crate::stats::{PlayerStats, SessionSummary};
use crate::tuning::Difficulty;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Seal Clash core loaded");
}

/// One run driven from JavaScript
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    rules: Rules,
    settings: Settings,
    difficulty: Difficulty,
    input: TickInput,
    accumulator: f32,
    /// Gesture held on the previous frame; a seal forms when it changes
    held: GestureLabel,
    events: Vec<GameEvent>,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a run with the default preferences for `difficulty`
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, difficulty: &str) -> WebGame {
        let settings = Settings {
            difficulty: Difficulty::from_str(difficulty).unwrap_or_default(),
            ..Default::default()
        };
        Self::with_rules(seed, Self::settings_rules(&settings), settings)
    }

    /// Start a run under saved player preferences
    #[wasm_bindgen(js_name = withSettings)]
    pub fn with_settings(seed: u32, settings_json: &str) -> Result<WebGame, JsValue> {
        let settings = Settings::from_json(settings_json).map_err(js_error)?;
        Ok(Self::with_rules(seed, Self::settings_rules(&settings), settings))
    }

    /// Start a run with tuning loaded from JSON
    #[wasm_bindgen(js_name = withTuning)]
    pub fn with_tuning(seed: u32, tuning_json: &str) -> Result<WebGame, JsValue> {
        let rules = Rules::from_tuning_json(tuning_json).map_err(js_error)?;
        let settings = Settings {
            difficulty: rules.tuning.difficulty,
            gesture_confidence: rules.tuning.min_gesture_confidence,
            cast_on_match: rules.tuning.cast_on_match,
            ..Default::default()
        };
        Ok(Self::with_rules(seed, rules, settings))
    }

    /// Feed one recognizer result. Holding a gesture forms a single seal;
    /// the hand position aims the next release.
    #[wasm_bindgen(js_name = pushGesture)]
    pub fn push_gesture(&mut self, label: &str, confidence: f32, x: f32, y: f32) {
        let label = GestureLabel::from_str(label);
        self.input.aim = Some(Vec2::new(x, y));

        let min_confidence = self.rules.tuning.min_gesture_confidence;
        let Some(seal) = SealSymbol::from_gesture(label, confidence, min_confidence) else {
            if label == GestureLabel::None {
                self.held = GestureLabel::None;
            }
            return;
        };
        if label == self.held {
            return;
        }
        self.held = label;
        self.input.seals.push(seal);
    }

    pub fn release(&mut self) {
        self.input.release = true;
    }

    pub fn undo(&mut self) {
        self.input.undo = true;
    }

    #[wasm_bindgen(js_name = clearSeals)]
    pub fn clear_seals(&mut self) {
        self.input.clear_seals = true;
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn restart(&mut self) {
        self.input.restart = true;
    }

    /// Advance by a frame of `dt` seconds; returns the events as a JSON array
    pub fn tick(&mut self, dt: f32) -> String {
        let dt = dt.clamp(0.0, 0.1);
        self.accumulator += dt;

        // One-shot inputs go through the first substep even on a short frame
        let mut substeps = 0;
        let mut pending = self.has_pending_input();
        while (self.accumulator >= SIM_DT || pending) && substeps < MAX_SUBSTEPS {
            let step = if self.accumulator >= SIM_DT { SIM_DT } else { 0.0 };
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &self.rules, &input, step, &mut self.events);
            self.input.aim = input.aim;
            self.accumulator -= step;
            substeps += 1;
            pending = false;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        for event in &mut self.events {
            self.settings.adjust_event(event);
        }
        let json = serde_json::to_string(&self.events).unwrap_or_else(|_| "[]".to_string());
        self.events.clear();
        json
    }

    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_default()
    }

    #[wasm_bindgen(js_name = summaryJson)]
    pub fn summary_json(&self) -> String {
        let summary = SessionSummary::from_state(&self.state, self.difficulty);
        serde_json::to_string(&summary).unwrap_or_default()
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Jutsu mastery as JSON, for the save collaborator
    #[wasm_bindgen(js_name = masteryJson)]
    pub fn mastery_json(&self) -> String {
        self.state.mastery.to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Restore saved mastery; it carries over restarts from here on
    #[wasm_bindgen(js_name = loadMastery)]
    pub fn load_mastery(&mut self, json: &str) -> Result<(), JsValue> {
        self.state.mastery = Mastery::from_json(json).map_err(js_error)?;
        Ok(())
    }

    /// Fold the current run into saved stats and check achievements.
    /// Empty strings stand for nothing saved yet. Returns
    /// `{ stats, achievements, unlocked }` as JSON.
    #[wasm_bindgen(js_name = recordRun)]
    pub fn record_run(&self, stats_json: &str, achievements_json: &str, timestamp: f64) -> Result<String, JsValue> {
        let mut stats = if stats_json.is_empty() {
            PlayerStats::default()
        } else {
            PlayerStats::from_json(stats_json).map_err(js_error)?
        };
        let mut achievements = if achievements_json.is_empty() {
            Achievements::default()
        } else {
            Achievements::from_json(achievements_json).map_err(js_error)?
        };

        stats.record(&SessionSummary::from_state(&self.state, self.difficulty));
        let unlocked: Vec<&str> = achievements
            .check(&stats, &self.state.mastery, timestamp)
            .iter()
            .map(|a| a.id)
            .collect();

        let result = serde_json::json!({
            "stats": stats,
            "achievements": achievements,
            "unlocked": unlocked,
        });
        Ok(result.to_string())
    }
}

impl WebGame {
    fn settings_rules(settings: &Settings) -> Rules {
        Rules {
            tuning: settings.tuning(),
            ..Default::default()
        }
    }

    fn with_rules(seed: u32, rules: Rules, settings: Settings) -> Self {
        log::info!(
            "New run (seed {}, difficulty {})",
            seed,
            rules.tuning.difficulty.as_str()
        );
        Self {
            state: GameState::new(u64::from(seed), &rules.tuning),
            difficulty: rules.tuning.difficulty,
            rules,
            settings,
            input: TickInput::default(),
            accumulator: 0.0,
            held: GestureLabel::None,
            events: Vec::new(),
        }
    }

    fn has_pending_input(&self) -> bool {
        let input = &self.input;
        !input.seals.is_empty()
            || input.undo
            || input.clear_seals
            || input.release
            || input.pause
            || input.restart
    }
}
