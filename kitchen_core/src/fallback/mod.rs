//! The generative fallback, asked only when no recipe matches.
//!
//! Any failure (transport, HTTP status, missing or malformed payload,
//! timeout) resolves to `None`. The engine treats "no answer" as a normal
//! outcome, never as a crash.

mod gemini;

pub use gemini::*;

use kitchen_rules::{CookingMethod, Item, ResultDescriptor};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// An external service that can invent a result for unknown combinations.
pub trait FallbackResolver: Send + Sync {
    /// Produce a result for `items` under `method`, or `None`.
    fn resolve(
        &self,
        items: &[Item],
        method: CookingMethod,
    ) -> impl Future<Output = Option<ResultDescriptor>> + Send;
}

/// Resolver used when no generative service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineResolver;

impl FallbackResolver for OfflineResolver {
    async fn resolve(&self, _items: &[Item], _method: CookingMethod) -> Option<ResultDescriptor> {
        None
    }
}

impl<R: FallbackResolver> FallbackResolver for Option<R> {
    async fn resolve(&self, items: &[Item], method: CookingMethod) -> Option<ResultDescriptor> {
        match self {
            Some(resolver) => resolver.resolve(items, method).await,
            None => None,
        }
    }
}

/// Run `resolver` with an upper bound; an elapsed timeout counts as no answer.
pub async fn resolve_within<R: FallbackResolver>(
    resolver: &R,
    items: &[Item],
    method: CookingMethod,
    limit: Duration,
) -> Option<ResultDescriptor> {
    match tokio::time::timeout(limit, resolver.resolve(items, method)).await {
        Ok(answer) => answer,
        Err(_) => {
            tracing::warn!(?method, timeout_ms = limit.as_millis() as u64, "fallback timed out");
            None
        }
    }
}

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("no API key configured (set {0})")]
    MissingApiKey(String),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("service returned HTTP {0}")]
    Status(u16),

    #[error("response carried no text payload")]
    MissingPayload,

    #[error("malformed result: {0}")]
    Malformed(String),
}

/// Natural-language request for a combination.
pub fn build_prompt(items: &[Item], method: CookingMethod) -> String {
    let names: Vec<_> = items.iter().map(|item| item.name.as_str()).collect();
    format!(
        "Find a common culinary dish or food preparation that results from combining {} \
         using the technique: {}.\n\n\
         Format your response as a JSON object with:\n\
         1. name: The common name of the dish.\n\
         2. emoji: A relevant food emoji.\n\
         3. description: A one-sentence explanation of why these ingredients work together with this method.\n\n\
         Provide only the JSON object.",
        names.join(" and "),
        method.tag()
    )
}

/// The three fields the service must return. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct GeneratedDish {
    name: String,
    emoji: String,
    description: String,
}

/// Decode the service's JSON answer into a result descriptor.
pub fn parse_generated(text: &str) -> Result<ResultDescriptor, FallbackError> {
    let dish: GeneratedDish =
        serde_json::from_str(text.trim()).map_err(|e| FallbackError::Malformed(e.to_string()))?;

    let name = dish.name.trim();
    if name.is_empty() {
        return Err(FallbackError::Malformed("blank dish name".to_string()));
    }

    Ok(ResultDescriptor::new(name, dish.emoji.trim(), dish.description.trim()))
}
