//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
///
/// Every variant is a transport-level fault from the pipeline's point of view:
/// the request never produced a document to validate.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("LLM API key not found. Set the {env_var} environment variable.")]
    MissingApiKey { env_var: String },

    #[error("Model name is empty; set llm.model or GROQ_MODEL")]
    MissingModel,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unknown LLM provider: '{0}'. Supported: groq, openai")]
    UnknownProvider(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Check if the client may transparently retry this error
    ///
    /// Request timeouts (408) and 5xx statuses are transient; rate limits
    /// are not retried by the client.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::ApiError { status, .. } => *status == 408 || *status >= 500,
            LlmError::Network(_) => true,
            LlmError::Timeout(_) => true,
            LlmError::RateLimited { .. }
            | LlmError::MissingApiKey { .. }
            | LlmError::MissingModel
            | LlmError::InvalidResponse(_)
            | LlmError::UnknownProvider(_)
            | LlmError::Json(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        // 5xx errors are transient
        assert!(
            LlmError::ApiError {
                status: 502,
                message: "Bad gateway".to_string()
            }
            .is_retryable()
        );

        // 4xx errors are not
        assert!(
            !LlmError::ApiError {
                status: 400,
                message: "Bad request".to_string()
            }
            .is_retryable()
        );

        // Request timeout status is transient, rate limits are surfaced
        assert!(
            LlmError::ApiError {
                status: 408,
                message: "Request timeout".to_string()
            }
            .is_retryable()
        );
        assert!(
            !LlmError::RateLimited {
                retry_after: Duration::from_secs(60)
            }
            .is_retryable()
        );

        assert!(LlmError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(
            !LlmError::MissingApiKey {
                env_var: "GROQ_API_KEY".to_string()
            }
            .is_retryable()
        );
        assert!(!LlmError::InvalidResponse("Bad JSON".to_string()).is_retryable());
    }

    #[test]
    fn test_missing_key_message_names_env_var() {
        let err = LlmError::MissingApiKey {
            env_var: "GROQ_API_KEY".to_string(),
        };
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }
}
