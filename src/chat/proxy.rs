//! HTTP client for the chat proxy endpoint.
//!
//! The proxy holds the real provider credentials; this client only POSTs
//! `{ "messages": [...], "model": "..." }` and reads the reply text from
//! either the chat-completions shape (`choices[0].message.content`) or the
//! flat fallback (`output`). One round trip per call, no retries.

use serde::Serialize;
use serde_json::Value;

use super::types::{ChatProxy, Message, ProxyError};

pub struct ProxyClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl ProxyClient {
    /// # Errors
    ///
    /// Returns [`ProxyError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, ProxyError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ProxyError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint: endpoint.into(), model: model.into() })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, messages: &[Message]) -> Result<String, ProxyError> {
        let body = ProxyRequest { messages, model: &self.model };
        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProxyError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProxyError::Network(e.to_string()))?;
        if !status.is_success() {
            return Err(ProxyError::Remote { status: status.as_u16(), body: text });
        }
        parse_reply(&text)
    }
}

#[async_trait::async_trait]
impl ChatProxy for ProxyClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, ProxyError> {
        tracing::debug!(endpoint = %self.endpoint, messages = messages.len(), "dispatching chat request");
        self.send(messages).await
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct ProxyRequest<'a> {
    messages: &'a [Message],
    model: &'a str,
}

/// Extract the reply text from a 2xx response body.
pub(crate) fn parse_reply(json_text: &str) -> Result<String, ProxyError> {
    let root: Value =
        serde_json::from_str(json_text).map_err(|e| ProxyError::MalformedResponse(format!("body is not JSON: {e}")))?;

    if let Some(content) = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
    {
        return Ok(content.to_string());
    }

    if let Some(output) = root.get("output").and_then(Value::as_str) {
        return Ok(output.to_string());
    }

    Err(ProxyError::MalformedResponse(
        "expected choices[0].message.content or output".to_string(),
    ))
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
