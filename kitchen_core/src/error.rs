//! Error types for the engine, storage and configuration layers.

use kitchen_rules::{ItemId, RuleError};
use thiserror::Error;

/// Everything the engine can report back to the player.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Not enough (distinct) ingredients for the chosen method.
    #[error("{0}")]
    Validation(String),

    /// No recipe matched and the fallback produced nothing.
    #[error("{0}")]
    ResolutionFailure(String),

    #[error("a resolution is already in progress")]
    Busy,

    #[error("no resolution is in progress")]
    NotResolving,

    #[error("unknown ingredient '{0}'")]
    UnknownItem(ItemId),

    #[error("the mixing bowl already holds {0} ingredients")]
    SelectionFull(usize),

    #[error(transparent)]
    Rule(#[from] RuleError),
}

impl EngineError {
    /// Whether the error should be shown to the player as-is.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_) | EngineError::ResolutionFailure(_) | EngineError::Rule(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
