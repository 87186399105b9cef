/// Route Suggestion Module
///
/// All route knowledge (which buses run, fares, travel times) comes from an
/// external generative-AI service. This module owns the seam to it:
///
/// 1. **Provider Trait** - `SuggestionProvider`, the opaque collaborator boundary
/// 2. **Providers** - `GeminiProvider` (HTTP) and `MockProvider` (deterministic)
/// 3. **Orchestrator** - prompt and schema building, response validation,
///    failure-to-`None` mapping
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use bus_route::route::Language;
/// use bus_route::suggest::{GeminiProvider, RouteOrchestrator};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let orchestrator = RouteOrchestrator::new(Arc::new(GeminiProvider::from_env()?));
///     if let Some(suggestion) = orchestrator
///         .fetch_suggestion("Dhaka", "Chittagong", Language::En)
///         .await
///     {
///         println!("{:?}", suggestion.suggested_buses);
///     }
///     Ok(())
/// }
/// ```
pub mod error;
pub mod gemini;
pub mod mock;
pub mod orchestrator;
pub mod provider;

pub use error::{SuggestError, SuggestResult};
pub use gemini::{DEFAULT_MODEL, GeminiProvider};
pub use mock::{MockMode, MockProvider};
pub use orchestrator::{
    RouteOrchestrator, build_prompt, build_request, parse_suggestion, response_schema,
};
pub use provider::{SuggestionProvider, SuggestionRequest};
