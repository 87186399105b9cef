//! Gemini API provider for route suggestions
//!
//! This module integrates with the Google Generative Language API
//! (`models/{model}:generateContent`) in JSON response mode, passing the
//! orchestrator's response schema so the answer can be parsed directly.
//!
//! # Authentication
//!
//! The provider loads the API key from the `GEMINI_API_KEY` environment
//! variable, falling back to `API_KEY`. Obtain a key from:
//! https://aistudio.google.com/
//!
//! # Example
//!
//! ```ignore
//! use bus_route::route::Language;
//! use bus_route::suggest::{GeminiProvider, SuggestionProvider, build_request};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GeminiProvider::from_env()?;
//!     let text = provider
//!         .generate(&build_request("Dhaka", "Chittagong", Language::Bn))
//!         .await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

use crate::suggest::error::{SuggestError, SuggestResult};
use crate::suggest::provider::{SuggestionProvider, SuggestionRequest};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Default model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Environment variables consulted for the API key, in order
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate; empty when there is none
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Gemini `generateContent` provider
#[derive(Clone)]
pub struct GeminiProvider {
    /// API key for authentication
    api_key: String,
    model: String,
    client: reqwest::Client,
    base_url: String,
}

impl GeminiProvider {
    /// Per-request timeout; the application itself enforces none
    const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Create a new provider with an explicit API key and model
    ///
    /// # Returns
    ///
    /// * `Ok(Self)` - New provider instance
    /// * `Err(SuggestError)` - If the key or model is empty, or the HTTP client cannot be built
    pub fn new(api_key: String, model: impl Into<String>) -> SuggestResult<Self> {
        if api_key.trim().is_empty() {
            return Err(SuggestError::ConfigError("API key cannot be empty".to_string()));
        }
        let model = model.into();
        if model.trim().is_empty() {
            return Err(SuggestError::ConfigError("Model name cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(Self::REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                SuggestError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key,
            model,
            client,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        })
    }

    /// Create a provider from `GEMINI_API_KEY` (or `API_KEY`) with the default model
    pub fn from_env() -> SuggestResult<Self> {
        Self::from_env_with_model(DEFAULT_MODEL)
    }

    pub fn from_env_with_model(model: &str) -> SuggestResult<Self> {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| {
                SuggestError::ConfigError(
                    "GEMINI_API_KEY environment variable not set".to_string(),
                )
            })?;

        Self::new(api_key, model)
    }

    /// Point the provider at a different API root (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn request_body<'a>(request: &'a SuggestionRequest) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.response_schema,
            },
        }
    }
}

/// Rate limiting and server faults are the provider's; other 4xx replies
/// mean the key, model or request is wrong
fn status_error(status: StatusCode, error_text: &str) -> SuggestError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        SuggestError::ProviderError(format!("API rate limited ({}): {}", status, error_text))
    } else if status.is_client_error() {
        SuggestError::ConfigError(format!("API client error ({}): {}", status, error_text))
    } else {
        SuggestError::ProviderError(format!("API server error ({}): {}", status, error_text))
    }
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl SuggestionProvider for GeminiProvider {
    async fn generate(&self, request: &SuggestionRequest) -> SuggestResult<String> {
        let url = self.endpoint();
        debug!("Sending request to Gemini API: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Gemini API error: {} - {}", status, error_text);
            return Err(status_error(status, &error_text));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            SuggestError::ProviderError(format!("Failed to parse API envelope: {}", e))
        })?;

        if let Some(usage) = &body.usage_metadata {
            info!(
                "Gemini usage - prompt: {:?} tokens, response: {:?} tokens",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }
        if let Some(reason) = body.candidates.first().and_then(|c| c.finish_reason.as_deref()) {
            debug!("Gemini finish reason: {}", reason);
        }

        Ok(body.text())
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }
}
