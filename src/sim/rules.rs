//! Read-only rules a run is played under

use super::boss::{BossBrain, FirstReady};
use super::jutsu::JutsuCatalog;
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Balance, catalog and boss strategy, validated once before the first tick
pub struct Rules {
    pub tuning: Tuning,
    pub catalog: JutsuCatalog,
    pub boss_brain: Box<dyn BossBrain>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            catalog: JutsuCatalog::standard(),
            boss_brain: Box::new(FirstReady),
        }
    }
}

impl Rules {
    pub fn new(tuning: Tuning, catalog: JutsuCatalog) -> Result<Self, ConfigError> {
        tuning.validate()?;
        catalog.validate()?;
        Ok(Self {
            tuning,
            catalog,
            boss_brain: Box::new(FirstReady),
        })
    }

    pub fn with_boss_brain(mut self, brain: impl BossBrain + 'static) -> Self {
        self.boss_brain = Box::new(brain);
        self
    }

    /// Load tuning from JSON on top of the standard catalog
    pub fn from_tuning_json(json: &str) -> Result<Self, ConfigError> {
        let tuning = Tuning::from_json(json).inspect_err(|err| {
            log::warn!("Rejected tuning: {}", err);
        })?;
        Self::new(tuning, JutsuCatalog::standard())
    }
}
