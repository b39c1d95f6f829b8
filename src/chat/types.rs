//! Chat types: wire messages, proxy errors and the proxy trait.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by a chat proxy round trip.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The request never produced an HTTP response (DNS, connect, reset...).
    #[error("network error: {0}")]
    Network(String),

    /// The proxy answered with a non-success HTTP status.
    #[error("remote error: status {status}: {body}")]
    Remote { status: u16, body: String },

    /// The proxy answered 2xx but without a recognizable reply field.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ErrorCode for ProxyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E_NETWORK",
            Self::Remote { .. } => "E_REMOTE",
            Self::MalformedResponse(_) => "E_MALFORMED_RESPONSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}

// =============================================================================
// MESSAGE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of the conversation context sent on every turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

// =============================================================================
// CHAT PROXY TRAIT
// =============================================================================

/// Async seam over the remote chat endpoint. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatProxy: Send + Sync {
    /// Send the full ordered message log and return the assistant reply text.
    ///
    /// # Errors
    ///
    /// Returns a [`ProxyError`] for transport failures, non-success statuses,
    /// and success bodies without a reply field.
    async fn complete(&self, messages: &[Message]) -> Result<String, ProxyError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
