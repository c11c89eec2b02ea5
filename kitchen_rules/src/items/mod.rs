//! Ingredient definitions: everything that can sit on the shelf.

mod seeds;

pub use seeds::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized identifier of an item, derived from its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    /// Derive the canonical id for a display name.
    ///
    /// The name is lowercased and every run of whitespace becomes a single
    /// `_`, so `"Diced  Tomato"` and `"diced tomato"` share `diced_tomato`.
    pub fn from_name(name: &str) -> Self {
        let lowered = name.to_lowercase();
        Self(lowered.split_whitespace().collect::<Vec<_>>().join("_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A discovered ingredient or dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub emoji: String,
    pub description: String,

    /// Whether the item came from a user-authored recipe.
    #[serde(default)]
    pub is_custom: bool,

    /// First discovery time. Seed items have none.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub discovered_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
}

impl Item {
    /// Create an undiscovered (seed) item; the id is derived from the name.
    pub fn new(
        name: impl Into<String>,
        emoji: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: ItemId::from_name(&name),
            name,
            emoji: emoji.into(),
            description: description.into(),
            is_custom: false,
            discovered_at: None,
            source_url: None,
            source_title: None,
        }
    }

    /// Materialize a result descriptor into a freshly discovered item.
    pub fn from_descriptor(result: &ResultDescriptor, discovered_at: DateTime<Utc>) -> Self {
        Self {
            id: ItemId::from_name(&result.name),
            name: result.name.clone(),
            emoji: result.emoji.clone(),
            description: result.description.clone(),
            is_custom: result.is_custom,
            discovered_at: Some(discovered_at),
            source_url: result.source_url.clone(),
            source_title: result.source_title.clone(),
        }
    }

    /// Set the discovery time.
    pub fn with_discovered_at(mut self, at: DateTime<Utc>) -> Self {
        self.discovered_at = Some(at);
        self
    }

    /// Mark the item as user-authored.
    pub fn with_custom(mut self, is_custom: bool) -> Self {
        self.is_custom = is_custom;
        self
    }

    /// Whether this is one of the starting ingredients.
    pub fn is_seed(&self) -> bool {
        self.discovered_at.is_none()
    }
}

/// What a recipe produces, before it becomes a catalog [`Item`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDescriptor {
    pub name: String,
    pub emoji: String,
    pub description: String,

    #[serde(default)]
    pub is_custom: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,
}

impl ResultDescriptor {
    pub fn new(
        name: impl Into<String>,
        emoji: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            emoji: emoji.into(),
            description: description.into(),
            is_custom: false,
            source_url: None,
            source_title: None,
        }
    }

    /// Set the custom flag.
    pub fn with_custom(mut self, is_custom: bool) -> Self {
        self.is_custom = is_custom;
        self
    }

    /// Attach provenance for generated results.
    pub fn with_source(mut self, url: impl Into<String>, title: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self.source_title = Some(title.into());
        self
    }

    /// The id this result will have once it is in the catalog.
    pub fn item_id(&self) -> ItemId {
        ItemId::from_name(&self.name)
    }
}
