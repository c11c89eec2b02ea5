//! The discovery log: one immutable record per successful resolution.

use kitchen_rules::{CookingMethod, Item};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for discovery records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscoveryId(pub Uuid);

impl DiscoveryId {
    /// Create a new random discovery ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DiscoveryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DiscoveryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single entry in the discovery book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryRecord {
    /// Records saved before ids existed get a fresh one on load.
    #[serde(default)]
    pub id: DiscoveryId,

    /// Display names of the inputs, in staging order.
    pub ingredients: Vec<String>,

    pub method: CookingMethod,

    /// The resulting catalog item.
    pub result: Item,

    /// Whether this resolution grew the catalog.
    pub is_new_discovery: bool,

    /// Whether the result came from the user's ledger.
    #[serde(default)]
    pub is_custom: bool,
}

impl DiscoveryRecord {
    pub fn new(
        ingredients: Vec<String>,
        method: CookingMethod,
        result: Item,
        is_new_discovery: bool,
        is_custom: bool,
    ) -> Self {
        Self {
            id: DiscoveryId::new(),
            ingredients,
            method,
            result,
            is_new_discovery,
            is_custom,
        }
    }
}

/// Append-only discovery history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    records: Vec<DiscoveryRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<DiscoveryRecord>) -> Self {
        Self { records }
    }

    /// Append a record.
    pub fn push(&mut self, record: DiscoveryRecord) {
        self.records.push(record);
    }

    /// Up to `limit` records, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&DiscoveryRecord> {
        self.records.iter().rev().take(limit).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiscoveryRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[DiscoveryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> DiscoveryRecord {
        DiscoveryRecord::new(
            vec!["Flour".to_string(), "Water".to_string()],
            CookingMethod::Mix,
            Item::new(name, "🥟", "Test."),
            true,
            false,
        )
    }

    #[test]
    fn test_recent_is_newest_first_and_capped() {
        let mut history = History::new();
        for name in ["A", "B", "C", "D"] {
            history.push(record(name));
        }

        let recent: Vec<_> = history.recent(3).iter().map(|r| r.result.name.clone()).collect();
        assert_eq!(recent, vec!["D", "C", "B"]);
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn test_record_ids_are_unique() {
        assert_ne!(record("A").id, record("A").id);
    }

    #[test]
    fn test_legacy_record_without_id() {
        let json = r#"{
            "ingredients": ["Flour", "Water"],
            "method": "MIX",
            "result": {"id": "dough", "name": "Dough", "emoji": "🥟", "description": "Elastic.", "discoveredAt": 1700000000000},
            "isNewDiscovery": true
        }"#;

        let parsed: DiscoveryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.result.name, "Dough");
        assert!(parsed.is_new_discovery);
        assert!(!parsed.is_custom);
    }
}
