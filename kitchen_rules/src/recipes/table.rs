//! A single ordered rule table.

use super::{IngredientKey, Rule, RuleMatch, RuleOrigin};
use crate::methods::CookingMethod;

/// Ordered list of rules scanned linearly; the first match wins.
#[derive(Debug, Clone)]
pub struct RuleTable {
    origin: RuleOrigin,
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(origin: RuleOrigin) -> Self {
        Self::from_rules(origin, Vec::new())
    }

    pub fn from_rules(origin: RuleOrigin, rules: Vec<Rule>) -> Self {
        Self { origin, rules }
    }

    pub fn origin(&self) -> RuleOrigin {
        self.origin
    }

    /// First rule in table order matching `method` and `key`.
    pub fn find(&self, method: CookingMethod, key: &IngredientKey) -> Option<RuleMatch<'_>> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(method, key))
            .map(|(index, rule)| RuleMatch {
                origin: self.origin,
                index,
                rule,
            })
    }

    /// Pairs `(winner, unreachable)` of rules sharing a method and key.
    pub fn ambiguities(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (later, rule) in self.rules.iter().enumerate() {
            if let Some(first) = self.find(rule.method, &rule.key()) {
                if first.index != later {
                    pairs.push((first.index, later));
                }
            }
        }
        pairs
    }

    /// Append a rule, returning its index.
    pub fn push(&mut self, rule: Rule) -> usize {
        self.rules.push(rule);
        self.rules.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Option<Rule> {
        if index < self.rules.len() {
            Some(self.rules.remove(index))
        } else {
            None
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
