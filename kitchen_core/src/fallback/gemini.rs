//! HTTP adapter for the Gemini `generateContent` endpoint.

use kitchen_rules::{CookingMethod, Item, ResultDescriptor};
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{build_prompt, parse_generated, FallbackError, FallbackResolver};
use crate::config::FallbackConfig;

/// Asks a Gemini model for a structured dish description.
#[derive(Debug, Clone)]
pub struct GeminiResolver {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl GeminiResolver {
    /// Build a resolver from config, reading the API key from the environment.
    pub fn new(config: &FallbackConfig) -> Self {
        let client = build_client(Client::builder().timeout(config.timeout()));

        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key(),
            api_key_env: config.api_key_env.clone(),
        }
    }

    /// `None` when the fallback is disabled in config.
    pub fn from_config(config: &FallbackConfig) -> Option<Self> {
        config.enabled.then(|| Self::new(config))
    }

    /// Override the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }

    /// One request/response round trip.
    pub async fn try_resolve(
        &self,
        items: &[Item],
        method: CookingMethod,
    ) -> Result<ResultDescriptor, FallbackError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| FallbackError::MissingApiKey(self.api_key_env.clone()))?;

        let request = generate_request(&build_prompt(items, method));
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FallbackError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let text = extract_text(&body)?;
        parse_generated(&text)
    }
}

impl FallbackResolver for GeminiResolver {
    async fn resolve(&self, items: &[Item], method: CookingMethod) -> Option<ResultDescriptor> {
        match self.try_resolve(items, method).await {
            Ok(result) => {
                tracing::debug!(?method, result = %result.name, "fallback produced a result");
                Some(result)
            }
            Err(e) => {
                tracing::warn!(?method, error = %e, "fallback combination failed");
                None
            }
        }
    }
}

/// Build the client, falling back to reqwest's defaults if the builder is
/// rejected.
fn build_client(builder: ClientBuilder) -> Client {
    match builder.build() {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "could not build HTTP client, using defaults");
            Client::default()
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

fn generate_request(prompt: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart {
                text: prompt.to_string(),
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: json!({
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "emoji": { "type": "STRING" },
                    "description": { "type": "STRING" }
                },
                "required": ["name", "emoji", "description"]
            }),
        },
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Pull the generated text out of a `generateContent` response body.
fn extract_text(body: &str) -> Result<String, FallbackError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| FallbackError::Malformed(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(FallbackError::MissingPayload)
    } else {
        Ok(text)
    }
}
