//! Errors raised while authoring or loading recipe rules.

use thiserror::Error;

use crate::items::ItemId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("a recipe needs one or two ingredients, got {0}")]
    IngredientCount(usize),

    #[error("select two different ingredients (both were '{0}')")]
    DuplicateIngredient(ItemId),

    #[error("no recipe at position {0}")]
    UnknownRule(usize),

    #[error("a recipe result needs a name")]
    BlankResultName,

    #[error("unknown cooking method '{0}'")]
    UnknownMethod(String),

    /// Malformed import payload; nothing was applied.
    #[error("invalid recipe ledger: {0}")]
    Format(String),

    #[error("catalog already contains '{0}'")]
    DuplicateItem(ItemId),
}
