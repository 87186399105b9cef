//! Mock suggestion provider for testing
//!
//! Deterministic, API-free provider for exercising the search pipeline
//! without an API key or network access. Also backs the `--mock` CLI flag.
//!
//! # Example
//!
//! ```ignore
//! use bus_route::route::Language;
//! use bus_route::suggest::{MockMode, MockProvider, SuggestionProvider, build_request};
//!
//! #[tokio::test]
//! async fn test_echo() {
//!     let mock = MockProvider::new(MockMode::Echo);
//!     let text = mock.generate(&build_request("A", "B", Language::En)).await.unwrap();
//!     assert!(text.contains("\"from\":\"A\""));
//! }
//! ```

use crate::route::Language;
use crate::suggest::error::{SuggestError, SuggestResult};
use crate::suggest::provider::{SuggestionProvider, SuggestionRequest};
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock answer modes for testing different provider behaviours
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Synthesise a valid one-bus suggestion for the queried endpoints
    Echo,

    /// Return this exact text
    Fixed(String),

    /// Return no text at all
    Empty,

    /// Return text that is not JSON
    Malformed,

    /// Fail as a provider-side error
    Error(String),
}

/// Mock provider that simulates the generative-AI service
#[derive(Debug)]
pub struct MockProvider {
    mode: MockMode,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            delay_ms: 0,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a MockProvider that sleeps `delay_ms` before answering
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            mode,
            delay_ms,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `generate` calls received so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn echo(request: &SuggestionRequest) -> String {
        let (fare, time, distance, tips) = match request.language {
            Language::Bn => ("৳ ৩০০", "৪ ঘণ্টা", "২০০ কিমি", "আগে থেকে টিকিট কাটুন"),
            Language::En => ("300 BDT", "4 hours", "200 km", "Buy tickets in advance"),
        };
        json!({
            "from": request.from,
            "to": request.to,
            "suggestedBuses": [
                {
                    "name": "Mock Express",
                    "startPoint": request.from,
                    "endPoint": request.to,
                }
            ],
            "distance": distance,
            "estimatedFare": fare,
            "travelTime": time,
            "tips": tips,
        })
        .to_string()
    }
}

#[async_trait]
impl SuggestionProvider for MockProvider {
    async fn generate(&self, request: &SuggestionRequest) -> SuggestResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;

        match &self.mode {
            MockMode::Echo => Ok(Self::echo(request)),
            MockMode::Fixed(text) => Ok(text.clone()),
            MockMode::Empty => Ok(String::new()),
            MockMode::Malformed => Ok("Sorry, I cannot help with buses today.".to_string()),
            MockMode::Error(msg) => Err(SuggestError::ProviderError(msg.clone())),
        }
    }

    fn provider_name(&self) -> &str {
        "Mock Provider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::orchestrator::build_request;

    #[tokio::test]
    async fn test_echo_produces_query_endpoints() {
        let mock = MockProvider::new(MockMode::Echo);
        let text = mock
            .generate(&build_request("Dhaka", "Sylhet", Language::En))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["from"], "Dhaka");
        assert_eq!(value["to"], "Sylhet");
        assert_eq!(value["suggestedBuses"][0]["endPoint"], "Sylhet");
        assert_eq!(value["travelTime"], "4 hours");
    }

    #[tokio::test]
    async fn test_echo_follows_language() {
        let mock = MockProvider::new(MockMode::Echo);
        let text = mock
            .generate(&build_request("ঢাকা", "সিলেট", Language::Bn))
            .await
            .unwrap();
        assert!(text.contains("ঘণ্টা"));
    }

    #[tokio::test]
    async fn test_fixed_and_empty_modes() {
        let request = build_request("A", "B", Language::En);
        let fixed = MockProvider::new(MockMode::Fixed("{}".to_string()));
        assert_eq!(fixed.generate(&request).await.unwrap(), "{}");

        let empty = MockProvider::new(MockMode::Empty);
        assert_eq!(empty.generate(&request).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_error_mode_returns_error() {
        let mock = MockProvider::new(MockMode::Error("quota exceeded".to_string()));
        let result = mock.generate(&build_request("A", "B", Language::En)).await;
        match result {
            Err(SuggestError::ProviderError(msg)) => assert_eq!(msg, "quota exceeded"),
            _ => panic!("Expected ProviderError"),
        }
    }

    #[tokio::test]
    async fn test_call_count_tracks_every_call() {
        let mock = MockProvider::new(MockMode::Malformed);
        let request = build_request("A", "B", Language::En);
        assert_eq!(mock.call_count(), 0);
        let _ = mock.generate(&request).await;
        let _ = mock.generate(&request).await;
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_delay_adds_latency() {
        let mock = MockProvider::with_delay(MockMode::Echo, 50);
        let start = std::time::Instant::now();
        let _ = mock.generate(&build_request("A", "B", Language::En)).await;
        assert!(start.elapsed().as_millis() >= 50);
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(MockProvider::new(MockMode::Echo).provider_name(), "Mock Provider");
    }
}
