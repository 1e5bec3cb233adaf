//! Provider-specific error handling.

use thiserror::Error;

/// Errors raised by LLM provider backends.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Credential variable not set for the selected provider.
    #[error("{provider} API key not found. Set the {variable} environment variable")]
    ApiKeyNotFound {
        /// Human-readable provider name.
        provider: &'static str,
        /// Environment variable(s) that would satisfy the requirement.
        variable: &'static str,
    },

    /// Provider returned a non-success HTTP status.
    #[error("API request failed: {0}")]
    ApiRequestFailed(String),

    /// Provider response body could not be decoded or held no text.
    #[error("Invalid response format: {0}")]
    InvalidResponseFormat(String),

    /// Transport-level failure before a response was received.
    #[error("Network error: {0}")]
    NetworkError(String),
}

// Note: anyhow already has a blanket impl for thiserror::Error types
