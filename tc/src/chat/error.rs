//! Conversation boundary error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur talking to the conversation engine
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The reply body was not the structured JSON shape we asked for.
    /// Surfaced to the user as a generic chat failure; the raw exchange is
    /// logged for diagnostics.
    #[error("Malformed reply: {0}")]
    MalformedReply(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt template error: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChatError {
    /// Check if this error is worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::ApiError { status, .. } => *status >= 500 || *status == 429,
            ChatError::Network(_) => true,
            ChatError::Timeout(_) => true,
            ChatError::MalformedReply(_) => false,
            ChatError::Json(_) => false,
            ChatError::Template(_) => false,
            ChatError::Config(_) => false,
        }
    }
}
