//! Request orchestration
//!
//! Builds the provider request for one `(from, to, language)` query, invokes
//! the provider and turns its raw text into a validated `RouteSuggestion`.
//! Every failure (transport, empty text, malformed JSON, schema violation)
//! is logged and collapses to `None`: no retries, no partial results, and
//! no history or storage side effects.

use crate::route::{BusDetail, Language, RouteSuggestion};
use crate::suggest::error::{SuggestError, SuggestResult};
use crate::suggest::provider::{SuggestionProvider, SuggestionRequest};
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, LazyLock};
use tracing::{error, info, warn};

/// Matches a whole reply wrapped in a Markdown code fence
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$").expect("code fence pattern is valid")
});

/// Instruction sent to the provider. Encodes the three hard constraints:
/// buses must reach `to`, each bus reports its absolute termini, and every
/// text field is written in the requested language.
pub fn build_prompt(from: &str, to: &str, language: Language) -> String {
    format!(
        "Suggest public bus services for travelling from \"{from}\" to \"{to}\".\n\
         \n\
         STRICT REQUIREMENTS:\n\
         1. List ONLY buses that definitely reach the destination \"{to}\".\n\
         2. For every bus give the absolute first stop (startPoint) and absolute last stop \
         (endPoint) of the whole line, not just the segment between \"{from}\" and \"{to}\".\n\
         3. Every text field MUST be written in {lang}.\n\
         \n\
         Answer with a single JSON object with the fields: from, to, suggestedBuses \
         (array of {{name, startPoint, endPoint}}), distance, estimatedFare, travelTime, tips.",
        lang = language.prompt_name(),
    )
}

/// JSON schema of the expected answer, in the provider's schema dialect
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "from": { "type": "STRING" },
            "to": { "type": "STRING" },
            "suggestedBuses": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "startPoint": { "type": "STRING" },
                        "endPoint": { "type": "STRING" }
                    },
                    "required": ["name", "startPoint", "endPoint"]
                }
            },
            "distance": { "type": "STRING" },
            "estimatedFare": { "type": "STRING" },
            "travelTime": { "type": "STRING" },
            "tips": { "type": "STRING" }
        },
        "required": [
            "from", "to", "suggestedBuses", "distance", "estimatedFare", "travelTime", "tips"
        ]
    })
}

pub fn build_request(from: &str, to: &str, language: Language) -> SuggestionRequest {
    SuggestionRequest {
        from: from.to_string(),
        to: to.to_string(),
        language,
        prompt: build_prompt(from, to, language),
        response_schema: response_schema(),
    }
}

/// Answer shape as the provider sends it. Has no `timestamp`: anything the
/// provider puts there is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSuggestion {
    from: String,
    to: String,
    suggested_buses: Vec<BusDetail>,
    distance: String,
    estimated_fare: String,
    travel_time: String,
    tips: String,
}

/// Parse and validate provider text for the query `(from, to)`.
///
/// The text is trimmed and unwrapped from a code fence if needed. All
/// fields are required; bus names must be non-empty. Empty echoed
/// endpoints fall back to the queried ones.
pub fn parse_suggestion(text: &str, from: &str, to: &str) -> SuggestResult<RouteSuggestion> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SuggestError::EmptyResponse);
    }

    let body = CODE_FENCE
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    let wire: WireSuggestion = serde_json::from_str(body)?;

    let mut buses = Vec::with_capacity(wire.suggested_buses.len());
    for (i, bus) in wire.suggested_buses.into_iter().enumerate() {
        let name = bus.name.trim();
        if name.is_empty() {
            return Err(SuggestError::InvalidSuggestion(format!(
                "bus at index {} has an empty name",
                i
            )));
        }
        buses.push(BusDetail {
            name: name.to_string(),
            start_point: bus.start_point.trim().to_string(),
            end_point: bus.end_point.trim().to_string(),
        });
    }

    let or_query = |echoed: String, queried: &str| {
        let echoed = echoed.trim();
        if echoed.is_empty() {
            queried.to_string()
        } else {
            echoed.to_string()
        }
    };

    Ok(RouteSuggestion {
        from: or_query(wire.from, from),
        to: or_query(wire.to, to),
        suggested_buses: buses,
        distance: wire.distance.trim().to_string(),
        estimated_fare: wire.estimated_fare.trim().to_string(),
        travel_time: wire.travel_time.trim().to_string(),
        tips: wire.tips.trim().to_string(),
        timestamp: None,
    })
}

/// Request Orchestrator over one provider
#[derive(Clone)]
pub struct RouteOrchestrator {
    provider: Arc<dyn SuggestionProvider>,
}

impl RouteOrchestrator {
    pub fn new(provider: Arc<dyn SuggestionProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Fetch one suggestion, surfacing the failure cause
    ///
    /// Callers are expected to have rejected empty `from`/`to` already.
    pub async fn try_fetch(
        &self,
        from: &str,
        to: &str,
        language: Language,
    ) -> SuggestResult<RouteSuggestion> {
        let request = build_request(from, to, language);
        let text = self.provider.generate(&request).await?;
        parse_suggestion(&text, from, to)
    }

    /// Fetch one suggestion; any failure is logged and yields `None`
    pub async fn fetch_suggestion(
        &self,
        from: &str,
        to: &str,
        language: Language,
    ) -> Option<RouteSuggestion> {
        match self.try_fetch(from, to, language).await {
            Ok(suggestion) => {
                info!(
                    "{} suggested {} bus(es) for {} → {} [{}]",
                    self.provider_name(),
                    suggestion.suggested_buses.len(),
                    from,
                    to,
                    language
                );
                Some(suggestion)
            }
            Err(SuggestError::EmptyResponse) => {
                warn!("{} returned no text content", self.provider_name());
                None
            }
            Err(e) => {
                error!("{} failed for {} → {}: {}", self.provider_name(), from, to, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for RouteOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteOrchestrator")
            .field("provider", &self.provider.provider_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::mock::{MockMode, MockProvider};

    const GREEN_LINE: &str = r#"{
        "from": "Dhaka",
        "to": "Chittagong",
        "suggestedBuses": [
            {"name": "Green Line", "startPoint": "Dhaka", "endPoint": "Chittagong"}
        ],
        "distance": "250km",
        "estimatedFare": "500",
        "travelTime": "5h",
        "tips": "Book early"
    }"#;

    fn orchestrator(mode: MockMode) -> (Arc<MockProvider>, RouteOrchestrator) {
        let mock = Arc::new(MockProvider::new(mode));
        let orchestrator = RouteOrchestrator::new(mock.clone());
        (mock, orchestrator)
    }

    // ========== Prompt Tests ==========

    #[test]
    fn test_prompt_encodes_constraints() {
        let prompt = build_prompt("Dhaka", "Sylhet", Language::Bn);
        assert!(prompt.contains("\"Dhaka\""));
        assert!(prompt.contains("reach the destination \"Sylhet\""));
        assert!(prompt.contains("absolute first stop"));
        assert!(prompt.contains("MUST be written in Bengali"));

        let prompt = build_prompt("Dhaka", "Sylhet", Language::En);
        assert!(prompt.contains("MUST be written in English"));
    }

    #[test]
    fn test_schema_requires_every_field() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(required.len(), 7);
        assert!(!required.contains(&"timestamp"));
        assert_eq!(schema["properties"]["suggestedBuses"]["type"], "ARRAY");
    }

    // ========== Parsing Tests ==========

    #[test]
    fn test_parse_valid_response() {
        let suggestion = parse_suggestion(GREEN_LINE, "Dhaka", "Chittagong").unwrap();
        assert_eq!(suggestion.suggested_buses.len(), 1);
        assert_eq!(suggestion.suggested_buses[0].name, "Green Line");
        assert_eq!(suggestion.estimated_fare, "500");
        assert_eq!(suggestion.timestamp, None);
    }

    #[test]
    fn test_parse_unwraps_code_fence() {
        let fenced = format!("```json\n{}\n```", GREEN_LINE);
        let suggestion = parse_suggestion(&fenced, "Dhaka", "Chittagong").unwrap();
        assert_eq!(suggestion.travel_time, "5h");
    }

    #[test]
    fn test_parse_empty_text() {
        assert_eq!(
            parse_suggestion("  \n ", "A", "B"),
            Err(SuggestError::EmptyResponse)
        );
    }

    #[test]
    fn test_parse_not_json() {
        assert!(matches!(
            parse_suggestion("no buses here", "A", "B"),
            Err(SuggestError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_missing_field_is_failure() {
        let text = r#"{"from":"A","to":"B","suggestedBuses":[],"distance":"1","travelTime":"2","tips":""}"#;
        assert!(matches!(
            parse_suggestion(text, "A", "B"),
            Err(SuggestError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unnamed_bus() {
        let text = r#"{"from":"A","to":"B","suggestedBuses":[{"name":"  ","startPoint":"A","endPoint":"B"}],
            "distance":"1","estimatedFare":"2","travelTime":"3","tips":""}"#;
        assert!(matches!(
            parse_suggestion(text, "A", "B"),
            Err(SuggestError::InvalidSuggestion(_))
        ));
    }

    #[test]
    fn test_parse_empty_bus_list_is_valid() {
        let text = r#"{"from":"A","to":"B","suggestedBuses":[],"distance":"1","estimatedFare":"2","travelTime":"3","tips":"walk"}"#;
        let suggestion = parse_suggestion(text, "A", "B").unwrap();
        assert!(suggestion.suggested_buses.is_empty());
    }

    #[test]
    fn test_parse_falls_back_to_queried_endpoints() {
        let text = r#"{"from":"","to":" ","suggestedBuses":[],"distance":"1","estimatedFare":"2","travelTime":"3","tips":""}"#;
        let suggestion = parse_suggestion(text, "Rajshahi", "Bogura").unwrap();
        assert_eq!(suggestion.from, "Rajshahi");
        assert_eq!(suggestion.to, "Bogura");
    }

    #[test]
    fn test_parse_ignores_provider_timestamp() {
        let text = r#"{"from":"A","to":"B","suggestedBuses":[],"distance":"1","estimatedFare":"2","travelTime":"3","tips":"","timestamp":5}"#;
        assert_eq!(parse_suggestion(text, "A", "B").unwrap().timestamp, None);
    }

    // ========== Fetch Tests ==========

    #[tokio::test]
    async fn test_fetch_success() {
        let (mock, orchestrator) = orchestrator(MockMode::Fixed(GREEN_LINE.to_string()));
        let suggestion = orchestrator
            .fetch_suggestion("Dhaka", "Chittagong", Language::En)
            .await
            .unwrap();
        assert_eq!(suggestion.suggested_buses[0].end_point, "Chittagong");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failures_collapse_to_none() {
        for mode in [
            MockMode::Empty,
            MockMode::Malformed,
            MockMode::Error("503".to_string()),
        ] {
            let (mock, orchestrator) = orchestrator(mode);
            assert!(
                orchestrator
                    .fetch_suggestion("A", "B", Language::Bn)
                    .await
                    .is_none()
            );
            // Exactly one attempt, no retries
            assert_eq!(mock.call_count(), 1);
        }
    }

    #[tokio::test]
    async fn test_try_fetch_reports_cause() {
        let (_, orchestrator) = orchestrator(MockMode::Error("down".to_string()));
        assert_eq!(
            orchestrator.try_fetch("A", "B", Language::En).await,
            Err(SuggestError::ProviderError("down".to_string()))
        );
    }
}
