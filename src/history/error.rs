/// Error types for history persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// The backing store could not be read or written
    StorageError(String),
    /// The persisted payload is not a valid history document
    SerializationError(String),
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            HistoryError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<std::io::Error> for HistoryError {
    fn from(err: std::io::Error) -> Self {
        HistoryError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        HistoryError::SerializationError(err.to_string())
    }
}

/// Result type for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;
