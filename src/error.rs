//! Startup-time configuration errors.
//!
//! The simulation itself never fails; malformed catalogs and tuning files are
//! rejected once, before the first tick.

use crate::sim::SealSymbol;

/// A jutsu catalog that cannot be matched against unambiguously
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog is empty")]
    Empty,

    #[error("jutsu '{id}' has no seals")]
    EmptySeals { id: String },

    #[error("jutsu '{id}' needs {len} seals, at most {max} are allowed")]
    TooManySeals { id: String, len: usize, max: usize },

    #[error("jutsu id '{id}' appears more than once")]
    DuplicateId { id: String },

    #[error("jutsu '{first}' and '{second}' share the seal sequence {seals:?}")]
    DuplicateSequence {
        first: String,
        second: String,
        seals: Vec<SealSymbol>,
    },
}

/// Errors loading tuning or catalog data
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}
