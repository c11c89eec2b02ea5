//! Resolution Engine - turns the mixing bowl into a discovery.
//!
//! The resolution algorithm works as follows:
//! 1. **Validate**: the method must have enough distinct inputs
//! 2. **Normalize**: sort the staged ids into an order-independent key
//! 3. **Lookup**: built-in recipes first, then the user's ledger
//! 4. **Fallback**: ask the generative service only when nothing matched
//! 5. **Materialize**: reuse the catalog entry for the result name, or add one
//! 6. **Record**: append a discovery to the history
//! 7. **Reset**: clear the bowl and return to idle
//!
//! The state machine is `Idle -> Resolving -> Idle` on success and
//! `Idle -> Resolving -> Failure -> Idle` on failure, where the last step
//! happens on its own once the recovery delay has passed.

mod selection;

pub use selection::*;

use chrono::Utc;
use kitchen_rules::{
    Catalog, CookingMethod, Item, ItemId, ResultDescriptor, Rule, RuleBook, MAX_MIX_ITEMS,
};
use std::time::Duration;
use tokio::time::Instant;

use crate::error::EngineError;
use crate::fallback::{resolve_within, FallbackResolver};
use crate::history::{DiscoveryRecord, History};

/// Shown when MIX is attempted with fewer than two distinct ingredients.
pub const INSUFFICIENT_INPUTS_MESSAGE: &str = "Mixing requires at least two items.";

/// Shown when neither the recipes nor the fallback produced anything.
pub const STUMPED_MESSAGE: &str = "The Alchemist is stumped... a new technique?";

/// Default time a failure stays visible before the engine returns to idle.
pub const DEFAULT_RECOVERY_DELAY: Duration = Duration::from_secs(5);

/// Where the engine is in its resolution cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Idle,
    /// Waiting on a resolution; staging is locked.
    Resolving,
    /// The last resolution failed; reverts to idle at `recover_at`.
    Failure { recover_at: Instant },
}

/// The outcome of the synchronous half of a resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Pending {
    /// A recipe matched; the descriptor's custom flag reflects its table.
    Matched(ResultDescriptor),
    /// Nothing matched; the fallback has to be asked.
    NeedsFallback(FallbackRequest),
}

/// What the fallback needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackRequest {
    pub items: Vec<Item>,
    pub method: CookingMethod,
}

/// Owns the catalog, history, recipe tables and the mixing bowl.
///
/// The engine has no storage dependency; persisting after mutations is the
/// job of [`crate::session::Session`].
#[derive(Debug, Clone)]
pub struct ResolutionEngine {
    catalog: Catalog,
    history: History,
    rules: RuleBook,
    selection: MixingSelection,
    status: EngineStatus,
    message: Option<String>,
    last_discovery: Option<DiscoveryRecord>,
    recovery_delay: Duration,
}

impl Default for ResolutionEngine {
    fn default() -> Self {
        Self::new(Catalog::seeded(), History::new(), RuleBook::new())
    }
}

impl ResolutionEngine {
    pub fn new(catalog: Catalog, history: History, rules: RuleBook) -> Self {
        Self {
            catalog,
            history,
            rules,
            selection: MixingSelection::new(),
            status: EngineStatus::Idle,
            message: None,
            last_discovery: None,
            recovery_delay: DEFAULT_RECOVERY_DELAY,
        }
    }

    /// Set how long a failure lingers before the engine is idle again.
    pub fn with_recovery_delay(mut self, delay: Duration) -> Self {
        self.recovery_delay = delay;
        self
    }

    /// Current status. An expired failure already reads as idle.
    pub fn status(&self) -> EngineStatus {
        match self.status {
            EngineStatus::Failure { recover_at } if Instant::now() >= recover_at => {
                EngineStatus::Idle
            }
            status => status,
        }
    }

    /// Commit an expired failure back to idle.
    pub fn settle(&mut self) {
        self.status = self.status();
    }

    pub fn is_resolving(&self) -> bool {
        self.status == EngineStatus::Resolving
    }

    /// The user-facing message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    pub fn selection(&self) -> &MixingSelection {
        &self.selection
    }

    /// The most recent success, kept until the caller dismisses it.
    pub fn last_discovery(&self) -> Option<&DiscoveryRecord> {
        self.last_discovery.as_ref()
    }

    pub fn dismiss_discovery(&mut self) -> Option<DiscoveryRecord> {
        self.last_discovery.take()
    }

    /// Whether a single staged item can be cooked directly.
    pub fn can_resolve_directly(&self) -> bool {
        self.selection.len() == 1 && self.status() == EngineStatus::Idle
    }

    /// Put an ingredient in the bowl.
    ///
    /// Returns `true` when the bowl is now full, in which case the caller
    /// should resolve immediately.
    pub fn stage(&mut self, id: &ItemId) -> Result<bool, EngineError> {
        self.ensure_not_resolving()?;
        self.settle();

        if !self.catalog.contains(id) {
            return Err(EngineError::UnknownItem(id.clone()));
        }
        if self.selection.is_full() {
            return Err(EngineError::SelectionFull(MAX_MIX_ITEMS));
        }

        self.selection.push(id.clone());
        tracing::debug!(item = %id, staged = self.selection.len(), "staged ingredient");
        Ok(self.selection.is_full())
    }

    /// Choose the technique for the next resolution.
    pub fn select_method(&mut self, method: CookingMethod) -> Result<(), EngineError> {
        self.ensure_not_resolving()?;
        self.selection.set_method(method);
        Ok(())
    }

    /// Empty the bowl and dismiss any failure.
    pub fn clear_selection(&mut self) -> Result<(), EngineError> {
        self.ensure_not_resolving()?;
        self.reset_bowl();
        Ok(())
    }

    /// Validate the bowl and look the combination up.
    ///
    /// Returns `Ok(None)` for an empty bowl. On success the engine is
    /// `Resolving` until [`ResolutionEngine::complete_resolution`] is called.
    pub fn begin_resolution(&mut self) -> Result<Option<Pending>, EngineError> {
        self.ensure_not_resolving()?;
        if self.selection.is_empty() {
            return Ok(None);
        }

        let method = self.selection.method();
        if self.selection.distinct_count() < method.min_inputs() {
            tracing::debug!(?method, staged = self.selection.len(), "not enough inputs");
            self.message = Some(INSUFFICIENT_INPUTS_MESSAGE.to_string());
            return Err(EngineError::Validation(INSUFFICIENT_INPUTS_MESSAGE.to_string()));
        }

        let items = self.selected_items()?;
        self.status = EngineStatus::Resolving;
        self.message = None;

        let pending = match self.rules.lookup(method, self.selection.ids()) {
            Some(found) => {
                tracing::debug!(?method, origin = ?found.origin, index = found.index, "recipe matched");
                Pending::Matched(found.descriptor())
            }
            None => Pending::NeedsFallback(FallbackRequest { items, method }),
        };
        Ok(Some(pending))
    }

    /// Finish a resolution started by [`ResolutionEngine::begin_resolution`].
    pub fn complete_resolution(
        &mut self,
        answer: Option<ResultDescriptor>,
    ) -> Result<DiscoveryRecord, EngineError> {
        if self.status != EngineStatus::Resolving {
            return Err(EngineError::NotResolving);
        }

        let Some(result) = answer else {
            self.status = EngineStatus::Failure {
                recover_at: Instant::now() + self.recovery_delay,
            };
            self.message = Some(STUMPED_MESSAGE.to_string());
            tracing::info!(method = ?self.selection.method(), "resolution failed");
            return Err(EngineError::ResolutionFailure(STUMPED_MESSAGE.to_string()));
        };

        let ingredients = self.selected_names();
        let materialized = self.materialize(&result);
        self.status = EngineStatus::Idle;
        let (item, is_new) = materialized?;

        let record = DiscoveryRecord::new(
            ingredients,
            self.selection.method(),
            item,
            is_new,
            result.is_custom,
        );
        self.history.push(record.clone());
        self.selection.clear();
        self.last_discovery = Some(record.clone());

        tracing::info!(
            result = %record.result.name,
            new = record.is_new_discovery,
            custom = record.is_custom,
            "discovery"
        );
        Ok(record)
    }

    /// Run a whole resolution, asking `fallback` (bounded by `timeout`) when
    /// no recipe matches.
    pub async fn attempt_resolution<F: FallbackResolver>(
        &mut self,
        fallback: &F,
        timeout: Duration,
    ) -> Result<Option<DiscoveryRecord>, EngineError> {
        let Some(pending) = self.begin_resolution()? else {
            return Ok(None);
        };

        let mut guard = CancelGuard(self);
        let answer = match pending {
            Pending::Matched(result) => Some(result),
            Pending::NeedsFallback(request) => {
                resolve_within(fallback, &request.items, request.method, timeout).await
            }
        };

        guard.0.complete_resolution(answer).map(Some)
    }

    /// Append a rule to the ledger. Saving a rule also empties the bowl.
    pub fn add_rule(
        &mut self,
        ingredients: Vec<ItemId>,
        method: CookingMethod,
        result: ResultDescriptor,
    ) -> Result<usize, EngineError> {
        self.ensure_not_resolving()?;
        let index = self.rules.add_rule(ingredients, method, result)?;
        self.reset_bowl();
        Ok(index)
    }

    pub fn delete_rule(&mut self, index: usize) -> Result<Rule, EngineError> {
        self.ensure_not_resolving()?;
        Ok(self.rules.delete_rule(index)?)
    }

    /// Import a JSON ledger; rejected wholesale if any entry is malformed.
    pub fn import_rules(&mut self, json: &str) -> Result<usize, EngineError> {
        self.ensure_not_resolving()?;
        match self.rules.import_rules(json) {
            Ok(count) => Ok(count),
            Err(e) => {
                self.message = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn export_rules(&self) -> Result<String, EngineError> {
        Ok(self.rules.export_rules()?)
    }

    fn ensure_not_resolving(&self) -> Result<(), EngineError> {
        if self.is_resolving() {
            Err(EngineError::Busy)
        } else {
            Ok(())
        }
    }

    fn reset_bowl(&mut self) {
        self.selection.clear();
        self.status = EngineStatus::Idle;
        self.message = None;
    }

    fn selected_items(&self) -> Result<Vec<Item>, EngineError> {
        self.selection
            .ids()
            .iter()
            .map(|id| {
                self.catalog
                    .get(id)
                    .cloned()
                    .ok_or_else(|| EngineError::UnknownItem(id.clone()))
            })
            .collect()
    }

    fn selected_names(&self) -> Vec<String> {
        self.selection
            .ids()
            .iter()
            .map(|id| match self.catalog.get(id) {
                Some(item) => item.name.clone(),
                None => id.to_string(),
            })
            .collect()
    }

    /// Reuse the catalog entry for the result's name, or add a new one.
    fn materialize(&mut self, result: &ResultDescriptor) -> Result<(Item, bool), EngineError> {
        if let Some(existing) = self.catalog.find_by_name(&result.name) {
            return Ok((existing.clone(), false));
        }

        let item = Item::from_descriptor(result, Utc::now());
        self.catalog.insert(item.clone())?;
        Ok((item, true))
    }
}

/// Returns the engine to idle if a resolution is dropped mid-await.
struct CancelGuard<'a>(&'a mut ResolutionEngine);

impl Drop for CancelGuard<'_> {
    fn drop(&mut self) {
        if self.0.is_resolving() {
            tracing::debug!("resolution cancelled, returning to idle");
            self.0.status = EngineStatus::Idle;
        }
    }
}

#[cfg(test)]
mod tests;
