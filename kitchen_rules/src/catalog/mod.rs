//! The catalog - every item discovered so far, in discovery order.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RuleError;
use crate::items::{seed_items, Item, ItemId};

/// Ordered set of discovered items keyed by [`ItemId`].
///
/// Serialized as a plain array. Decoding goes through
/// [`Catalog::from_items`], so ids stay unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Item>::deserialize(deserializer).map(Self::from_items)
    }
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding the starting shelf.
    pub fn seeded() -> Self {
        Self { items: seed_items() }
    }

    /// Build a catalog from persisted items, keeping the first of any
    /// duplicated id.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut catalog = Self::new();
        for item in items {
            // Later duplicates are dropped.
            let _ = catalog.insert(item);
        }
        catalog
    }

    /// Get an item by id.
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Find the entry a result name resolves to.
    ///
    /// Matches names case-insensitively, then falls back to the derived id so
    /// that name lookup and id derivation always agree.
    pub fn find_by_name(&self, name: &str) -> Option<&Item> {
        let lowered = name.to_lowercase();
        self.items
            .iter()
            .find(|item| item.name.to_lowercase() == lowered)
            .or_else(|| self.get(&ItemId::from_name(name)))
    }

    /// Items whose name contains `term`, ignoring case.
    pub fn filter(&self, term: &str) -> Vec<&Item> {
        let term = term.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.name.to_lowercase().contains(&term))
            .collect()
    }

    /// Add a newly discovered item.
    pub fn insert(&mut self, item: Item) -> Result<&Item, RuleError> {
        if self.contains(&item.id) {
            return Err(RuleError::DuplicateItem(item.id));
        }
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
