//! Error types for tripweaver.

use thiserror::Error;

/// Primary error type for all planning operations.
#[derive(Error, Debug)]
pub enum TravelError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Failed to produce itinerary in {steps} steps")]
    StepLimitExceeded { steps: usize },

    #[error("Invalid itinerary: {0}")]
    InvalidItinerary(String),
}

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Server,
    Api,
    Configuration,
    Serialization,
    ToolExecution,
    Planning,
    Unknown,
}

impl TravelError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a tool execution error.
    pub fn tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolExecution {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::ToolExecution { .. } | Self::UnknownTool(_) | Self::InvalidArgument(_) => {
                ErrorCategory::ToolExecution
            }
            Self::StepLimitExceeded { .. } | Self::InvalidItinerary(_) => ErrorCategory::Planning,
            Self::Io(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TravelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_retryable_client_errors_are_not() {
        assert!(TravelError::api(503, "unavailable").is_retryable());
        assert!(!TravelError::api(400, "bad request").is_retryable());
        assert_eq!(
            TravelError::api(403, "forbidden").category(),
            ErrorCategory::Authentication
        );
    }

    #[test]
    fn planning_errors_are_terminal() {
        let err = TravelError::StepLimitExceeded { steps: 8 };
        assert_eq!(err.category(), ErrorCategory::Planning);
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Failed to produce itinerary in 8 steps");
    }

    #[test]
    fn unknown_tool_message_names_the_tool() {
        let err = TravelError::UnknownTool("call_train_agent".into());
        assert_eq!(err.to_string(), "Unknown tool: call_train_agent");
        assert_eq!(err.category(), ErrorCategory::ToolExecution);
    }
}
