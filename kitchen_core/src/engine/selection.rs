//! The mixing bowl: staged ingredients plus the chosen method.

use kitchen_rules::{CookingMethod, ItemId, MAX_MIX_ITEMS};
use std::collections::HashSet;

/// Transient, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MixingSelection {
    ids: Vec<ItemId>,
    method: CookingMethod,
}

impl MixingSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Staged ids in staging order.
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn method(&self) -> CookingMethod {
        self.method
    }

    pub fn set_method(&mut self, method: CookingMethod) {
        self.method = method;
    }

    pub(crate) fn push(&mut self, id: ItemId) {
        self.ids.push(id);
    }

    pub(crate) fn clear(&mut self) {
        self.ids.clear();
    }

    /// Number of different ingredients in the bowl.
    pub fn distinct_count(&self) -> usize {
        self.ids.iter().collect::<HashSet<_>>().len()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= MAX_MIX_ITEMS
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
