//! Cooking methods: the fixed set of techniques a combination can use.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::RuleError;

/// Maximum number of ingredients that can sit in the mixing bowl at once.
pub const MAX_MIX_ITEMS: usize = 2;

/// All techniques available at the workbench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CookingMethod {
    Chop,
    Blend,
    Boil,
    Fry,
    Bake,
    Griddle,
    /// Combines two distinct ingredients.
    #[default]
    Mix,
}

impl CookingMethod {
    /// Every method, in display order.
    pub const ALL: [CookingMethod; 7] = [
        CookingMethod::Chop,
        CookingMethod::Blend,
        CookingMethod::Boil,
        CookingMethod::Fry,
        CookingMethod::Bake,
        CookingMethod::Griddle,
        CookingMethod::Mix,
    ];

    /// The wire tag, as stored in rules and history.
    pub fn tag(&self) -> &'static str {
        match self {
            CookingMethod::Chop => "CHOP",
            CookingMethod::Blend => "BLEND",
            CookingMethod::Boil => "BOIL",
            CookingMethod::Fry => "FRY",
            CookingMethod::Bake => "BAKE",
            CookingMethod::Griddle => "GRIDDLE",
            CookingMethod::Mix => "MIX",
        }
    }

    /// Human-readable name for menus.
    pub fn display_name(&self) -> &'static str {
        match self {
            CookingMethod::Chop => "Chop",
            CookingMethod::Blend => "Blend",
            CookingMethod::Boil => "Boil",
            CookingMethod::Fry => "Fry",
            CookingMethod::Bake => "Bake",
            CookingMethod::Griddle => "Griddle",
            CookingMethod::Mix => "Mix",
        }
    }

    /// Minimum number of distinct ingredients this method needs.
    pub fn min_inputs(&self) -> usize {
        match self {
            CookingMethod::Mix => 2,
            _ => 1,
        }
    }
}

impl std::fmt::Display for CookingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for CookingMethod {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CookingMethod::ALL
            .into_iter()
            .find(|method| method.tag().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RuleError::UnknownMethod(wanted.to_string()))
    }
}
