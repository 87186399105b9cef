/// Error types for the route suggestion module
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestError {
    /// Provider misconfigured (missing or empty API key, bad model name)
    ConfigError(String),
    /// Transport-level failure talking to the provider
    NetworkError(String),
    /// Provider answered with a non-success status or an error payload
    ProviderError(String),
    /// Provider answered without any text
    EmptyResponse,
    /// Provider text was not the expected JSON document
    MalformedResponse(String),
    /// JSON parsed but violates the suggestion schema
    InvalidSuggestion(String),
}

impl std::fmt::Display for SuggestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            SuggestError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            SuggestError::ProviderError(msg) => write!(f, "Provider error: {}", msg),
            SuggestError::EmptyResponse => write!(f, "Provider returned no text content"),
            SuggestError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
            SuggestError::InvalidSuggestion(msg) => write!(f, "Invalid suggestion: {}", msg),
        }
    }
}

impl std::error::Error for SuggestError {}

impl From<reqwest::Error> for SuggestError {
    fn from(err: reqwest::Error) -> Self {
        SuggestError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for SuggestError {
    fn from(err: serde_json::Error) -> Self {
        SuggestError::MalformedResponse(err.to_string())
    }
}

/// Result type for suggestion operations
pub type SuggestResult<T> = Result<T, SuggestError>;
