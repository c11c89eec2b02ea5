//! Recipe rules and the two-tier rule book.
//!
//! Lookup works on an [`IngredientKey`]: the ingredient ids sorted into a
//! canonical order, so `[water, flour]` and `[flour, water]` hit the same
//! rule. The built-in table is always consulted before the user's ledger;
//! within a table the first rule in table order wins.

mod builtin;
mod table;

pub use builtin::*;
pub use table::*;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::items::{ItemId, ResultDescriptor};
use crate::methods::{CookingMethod, MAX_MIX_ITEMS};

/// Maps a method plus one or two ingredients to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Ingredient ids. Order is not significant for matching.
    pub ingredients: Vec<ItemId>,
    pub method: CookingMethod,
    pub result: ResultDescriptor,
}

impl Rule {
    pub fn new(
        ingredients: impl IntoIterator<Item = ItemId>,
        method: CookingMethod,
        result: ResultDescriptor,
    ) -> Self {
        Self {
            ingredients: ingredients.into_iter().collect(),
            method,
            result,
        }
    }

    /// The order-independent matching key for this rule.
    pub fn key(&self) -> IngredientKey {
        IngredientKey::new(&self.ingredients)
    }

    /// Whether this rule fires for `method` on `key`.
    pub fn matches(&self, method: CookingMethod, key: &IngredientKey) -> bool {
        self.method == method && &self.key() == key
    }
}

/// Ingredient ids in canonical (sorted) order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IngredientKey(Vec<ItemId>);

impl IngredientKey {
    pub fn new(ids: &[ItemId]) -> Self {
        let mut sorted = ids.to_vec();
        sorted.sort();
        Self(sorted)
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Which table a rule lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleOrigin {
    /// The fixed "laws of nature" shipped with the game.
    BuiltIn,
    /// The user's own recipe ledger.
    User,
}

/// A successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub origin: RuleOrigin,
    /// Position of the rule inside its table.
    pub index: usize,
    pub rule: &'a Rule,
}

impl RuleMatch<'_> {
    /// Whether the match came from the user's ledger.
    pub fn is_custom(&self) -> bool {
        self.origin == RuleOrigin::User
    }

    /// The rule's result, with the custom flag set by origin.
    pub fn descriptor(&self) -> ResultDescriptor {
        self.rule.result.clone().with_custom(self.is_custom())
    }
}

/// The built-in table plus the user's ledger.
#[derive(Debug, Clone)]
pub struct RuleBook {
    builtin: RuleTable,
    user: RuleTable,
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBook {
    /// Built-in recipes and an empty ledger.
    pub fn new() -> Self {
        Self::with_user_rules(Vec::new())
    }

    /// Built-in recipes plus a previously saved ledger.
    pub fn with_user_rules(rules: Vec<Rule>) -> Self {
        Self {
            builtin: RuleTable::from_rules(RuleOrigin::BuiltIn, builtin_rules()),
            user: RuleTable::from_rules(RuleOrigin::User, rules),
        }
    }

    /// Replace the built-in table. Mostly useful for tests and mods.
    pub fn with_builtin_rules(mut self, rules: Vec<Rule>) -> Self {
        self.builtin = RuleTable::from_rules(RuleOrigin::BuiltIn, rules);
        self
    }

    /// Resolve `method` over `ingredients`, built-in table first.
    pub fn lookup(&self, method: CookingMethod, ingredients: &[ItemId]) -> Option<RuleMatch<'_>> {
        let key = IngredientKey::new(ingredients);
        self.builtin
            .find(method, &key)
            .or_else(|| self.user.find(method, &key))
    }

    pub fn builtin(&self) -> &RuleTable {
        &self.builtin
    }

    pub fn user(&self) -> &RuleTable {
        &self.user
    }

    /// Author a new ledger entry.
    ///
    /// Ambiguous or shadowed rules are accepted; see
    /// [`RuleBook::shadowed_user_rules`] and [`RuleTable::ambiguities`].
    pub fn add_rule(
        &mut self,
        ingredients: Vec<ItemId>,
        method: CookingMethod,
        result: ResultDescriptor,
    ) -> Result<usize, RuleError> {
        if ingredients.is_empty() || ingredients.len() > MAX_MIX_ITEMS {
            return Err(RuleError::IngredientCount(ingredients.len()));
        }
        if ingredients.len() == 2 && ingredients[0] == ingredients[1] {
            return Err(RuleError::DuplicateIngredient(ingredients[0].clone()));
        }
        if result.name.trim().is_empty() {
            return Err(RuleError::BlankResultName);
        }

        let rule = Rule::new(ingredients, method, result.with_custom(true));
        Ok(self.user.push(rule))
    }

    /// Remove the ledger entry at `index`.
    pub fn delete_rule(&mut self, index: usize) -> Result<Rule, RuleError> {
        self.user.remove(index).ok_or(RuleError::UnknownRule(index))
    }

    /// Append a JSON array of rules to the ledger.
    ///
    /// The whole batch is validated before anything is applied. Returns the
    /// number of rules imported.
    pub fn import_rules(&mut self, json: &str) -> Result<usize, RuleError> {
        let batch = parse_rule_batch(json)?;
        let count = batch.len();
        for rule in batch {
            self.user.push(rule);
        }
        Ok(count)
    }

    /// Serialize the ledger as a JSON array.
    pub fn export_rules(&self) -> Result<String, RuleError> {
        serde_json::to_string_pretty(self.user.rules()).map_err(|e| RuleError::Format(e.to_string()))
    }

    /// Ledger entries that can never fire because a built-in rule owns the
    /// same method and ingredients.
    pub fn shadowed_user_rules(&self) -> Vec<usize> {
        self.user
            .rules()
            .iter()
            .enumerate()
            .filter(|(_, rule)| self.builtin.find(rule.method, &rule.key()).is_some())
            .map(|(index, _)| index)
            .collect()
    }
}

fn parse_rule_batch(json: &str) -> Result<Vec<Rule>, RuleError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| RuleError::Format(e.to_string()))?;
    let entries = value
        .as_array()
        .ok_or_else(|| RuleError::Format("expected a JSON array of recipes".to_string()))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let rule: Rule = serde_json::from_value(entry.clone())
                .map_err(|e| RuleError::Format(format!("entry {}: {}", index, e)))?;
            if rule.ingredients.is_empty() || rule.ingredients.len() > MAX_MIX_ITEMS {
                return Err(RuleError::Format(format!(
                    "entry {}: expected 1 or 2 ingredients, got {}",
                    index,
                    rule.ingredients.len()
                )));
            }
            if rule.result.name.trim().is_empty() {
                return Err(RuleError::Format(format!(
                    "entry {}: result name is blank",
                    index
                )));
            }
            Ok(rule)
        })
        .collect()
}
