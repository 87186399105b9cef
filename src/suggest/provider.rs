//! Suggestion provider trait
//!
//! This module defines the `SuggestionProvider` trait, the boundary to the
//! external generative-AI service. The application never interprets routes
//! itself: a provider receives a fully built request (prompt plus the JSON
//! schema the answer must follow) and hands back the raw text it produced.
//! Parsing and validation belong to the orchestrator.
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
//!     let request = build_request("Dhaka", "Sylhet", Language::En);
//!     let text = provider.generate(&request).await?;
//!     println!("{}", text);
//!     Ok(())
//! }
//! ```

use crate::route::Language;
use crate::suggest::error::SuggestResult;
use async_trait::async_trait;

/// Everything a provider needs to answer one route query
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionRequest {
    pub from: String,
    pub to: String,
    pub language: Language,
    /// Natural-language instruction carrying the hard constraints
    pub prompt: String,
    /// Schema the provider must shape its JSON answer after
    pub response_schema: serde_json::Value,
}

/// Generic trait for route suggestion providers
///
/// Implementations may be slow and unreliable (network bound). They must not
/// retry on their own behalf beyond what their transport does, and any
/// timeout is theirs to enforce.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Run one query and return the provider's raw answer text
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The text produced, possibly empty
    /// * `Err(SuggestError)` - Transport, configuration or provider-side failure
    async fn generate(&self, request: &SuggestionRequest) -> SuggestResult<String>;

    /// Name of this provider, used in log records
    fn provider_name(&self) -> &str;
}
