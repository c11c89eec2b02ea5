//! The player's session: engine + fallback + storage.
//!
//! The session is the only place that persists. Every operation that changes
//! the catalog, history or ledger saves all three keys afterwards.

use kitchen_rules::{CookingMethod, ItemId, ResultDescriptor, Rule, RuleBook};
use serde::Serialize;

use crate::config::KitchenConfig;
use crate::engine::{EngineStatus, ResolutionEngine};
use crate::error::{EngineError, StorageError};
use crate::fallback::FallbackResolver;
use crate::history::DiscoveryRecord;
use crate::storage::{load_state, save_state, BlobStore};

/// Counters shown in the shelf footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Successful resolutions so far.
    pub discoveries: usize,
    /// Entries in the user's recipe ledger.
    pub ledger: usize,
    /// Items in the catalog.
    pub discovered: usize,
}

pub struct Session<F, S> {
    engine: ResolutionEngine,
    fallback: F,
    store: S,
    config: KitchenConfig,
}

impl<F: FallbackResolver, S: BlobStore> Session<F, S> {
    /// Restore a session from `store`, falling back to a fresh kitchen.
    pub fn open(fallback: F, store: S, config: KitchenConfig) -> Self {
        let state = load_state(&store);
        tracing::info!(
            items = state.catalog.len(),
            history = state.history.len(),
            ledger = state.rules.len(),
            "session opened"
        );

        let engine = ResolutionEngine::new(
            state.catalog,
            state.history,
            RuleBook::with_user_rules(state.rules),
        )
        .with_recovery_delay(config.session.recovery_delay());

        Self {
            engine,
            fallback,
            store,
            config,
        }
    }

    pub fn engine(&self) -> &ResolutionEngine {
        &self.engine
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn status(&self) -> EngineStatus {
        self.engine.status()
    }

    pub fn message(&self) -> Option<&str> {
        self.engine.message()
    }

    /// Stage an ingredient; a full bowl resolves immediately.
    pub async fn stage(&mut self, id: &ItemId) -> Result<Option<DiscoveryRecord>, EngineError> {
        if self.engine.stage(id)? {
            self.resolve().await
        } else {
            Ok(None)
        }
    }

    pub fn select_method(&mut self, method: CookingMethod) -> Result<(), EngineError> {
        self.engine.select_method(method)
    }

    /// Resolve whatever is in the bowl.
    pub async fn resolve(&mut self) -> Result<Option<DiscoveryRecord>, EngineError> {
        let timeout = self.config.fallback.timeout();
        let outcome = self.engine.attempt_resolution(&self.fallback, timeout).await;
        if let Ok(Some(_)) = &outcome {
            self.persist();
        }
        outcome
    }

    pub fn clear(&mut self) -> Result<(), EngineError> {
        self.engine.clear_selection()?;
        self.persist();
        Ok(())
    }

    /// Close the success card.
    pub fn dismiss_discovery(&mut self) -> Option<DiscoveryRecord> {
        self.engine.dismiss_discovery()
    }

    /// Sleep until a pending failure has recovered.
    pub async fn wait_for_recovery(&mut self) {
        if let EngineStatus::Failure { recover_at } = self.engine.status() {
            tokio::time::sleep_until(recover_at).await;
        }
        self.engine.settle();
    }

    pub fn add_rule(
        &mut self,
        ingredients: Vec<ItemId>,
        method: CookingMethod,
        result: ResultDescriptor,
    ) -> Result<usize, EngineError> {
        let index = self.engine.add_rule(ingredients, method, result)?;
        self.persist();
        Ok(index)
    }

    pub fn delete_rule(&mut self, index: usize) -> Result<Rule, EngineError> {
        let removed = self.engine.delete_rule(index)?;
        self.persist();
        Ok(removed)
    }

    pub fn import_rules(&mut self, json: &str) -> Result<usize, EngineError> {
        let count = self.engine.import_rules(json)?;
        tracing::info!(count, "imported recipes");
        self.persist();
        Ok(count)
    }

    pub fn export_rules(&self) -> Result<String, EngineError> {
        self.engine.export_rules()
    }

    /// The discovery book, newest first, capped by config.
    pub fn recent_history(&self) -> Vec<&DiscoveryRecord> {
        self.engine
            .history()
            .recent(self.config.session.history_display_limit)
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            discoveries: self.engine.history().len(),
            ledger: self.engine.rules().user().len(),
            discovered: self.engine.catalog().len(),
        }
    }

    /// Write catalog, history and ledger to the store.
    pub fn save(&mut self) -> Result<(), StorageError> {
        save_state(
            &mut self.store,
            self.engine.catalog(),
            self.engine.history(),
            self.engine.rules().user().rules(),
        )
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            tracing::error!(error = %e, "failed to save session");
        }
    }
}
