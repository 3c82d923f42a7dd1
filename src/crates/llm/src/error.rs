//! Error types for model provider clients.

use thiserror::Error;

/// Result type for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur when talking to a model endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to serialize/deserialize data.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// API authentication failed (401/403).
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// No credential was supplied for a provider that needs one.
    #[error("API key not found: {0}")]
    ApiKeyNotFound(String),

    /// Provider service unavailable (e.g., Ollama not running).
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The provider answered, but not with anything usable.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The provider reported an error in an otherwise successful response.
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl LlmError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::HttpError(_) | LlmError::ServiceUnavailable(_) | LlmError::RateLimitExceeded(_)
        )
    }

    /// Check if this error is due to authentication.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            LlmError::AuthenticationError(_) | LlmError::ApiKeyNotFound(_)
        )
    }

    /// Map a non-success HTTP status and its body to an error.
    pub fn from_status(provider: &str, status: reqwest::StatusCode, body: String) -> Self {
        let detail = format!("{} returned {}: {}", provider, status, body);
        match status.as_u16() {
            401 | 403 => LlmError::AuthenticationError(detail),
            429 => LlmError::RateLimitExceeded(detail),
            502..=504 => LlmError::ServiceUnavailable(detail),
            _ => LlmError::ProviderError(detail),
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}
