//! Error types for AxiosChat
//!
//! Stage failures inside a turn are turned into in-band text by the session;
//! these errors surface only for caller mistakes, configuration problems and
//! as the internal currency between stages.

use crate::credentials::CredentialError;
use crate::functions::FunctionStatus;
use thiserror::Error;

/// Result type alias for AxiosChat operations
pub type Result<T> = std::result::Result<T, ChatError>;

/// Main error type for AxiosChat operations
#[derive(Debug, Error)]
pub enum ChatError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or malformed credential
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Model endpoint failure
    #[error("LLM error: {0}")]
    Llm(#[from] llm::LlmError),

    /// Function execution failure
    #[error("Execution error: {0}")]
    Execution(String),

    /// Function call state machine violation
    #[error("Function call {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: FunctionStatus,
        to: FunctionStatus,
    },

    /// Unknown function call id
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let err = ChatError::InvalidTransition {
            id: "func-1".to_string(),
            from: FunctionStatus::Executed,
            to: FunctionStatus::Pending,
        };
        assert_eq!(
            err.to_string(),
            "Function call func-1 cannot move from executed to pending"
        );
    }
}
