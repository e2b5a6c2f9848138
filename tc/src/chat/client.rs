//! HTTP conversation client
//!
//! Implements the ConversationClient trait against the chat backend with
//! bounded retries for transient failures.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::domain::ensure_item_ids;

use super::prompts::render_system_prompt;
use super::{ChatError, ChatReply, ChatRequest};

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504 | 529)
}

/// Boundary trait for the conversation engine
#[async_trait]
pub trait ConversationClient: Send + Sync {
    /// Run one conversation turn against the current trip
    async fn send_message(&self, request: ChatRequest) -> Result<ChatReply, ChatError>;
}

/// Conversation client talking JSON to the chat backend
pub struct HttpConversationClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl HttpConversationClient {
    /// Create a new client from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, ChatError> {
        let api_key = config.get_api_key().map_err(|e| ChatError::Config(e.to_string()))?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(ChatError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for one turn
    fn build_request_body(&self, request: &ChatRequest) -> Result<serde_json::Value, ChatError> {
        let system = render_system_prompt(request.trip.as_ref())?;
        Ok(serde_json::json!({
            "model": self.model,
            "maxTokens": self.max_tokens,
            "system": system,
            "text": request.text,
            "trip": request.trip,
            "history": request.history,
        }))
    }

    /// Parse the reply body, minting ids for any items the engine added
    fn parse_reply(&self, body: &str) -> Result<ChatReply, ChatError> {
        let mut reply: ChatReply = serde_json::from_str(body).map_err(|e| {
            // Keep the raw exchange for diagnostics; the user sees a generic error
            debug!(raw = %body, "chat: unparseable reply body");
            ChatError::MalformedReply(e.to_string())
        })?;

        if let Some(trip) = reply.trip.as_mut() {
            let minted = ensure_item_ids(trip);
            debug!(minted, "chat: ensured ids on replacement trip");
        }
        if let Some(update) = reply.trip_update.as_mut() {
            if let Some(days) = update.days.as_mut() {
                let mut minted = 0;
                for day in days.iter_mut() {
                    for item in &mut day.items {
                        if item.id.trim().is_empty() {
                            item.id = crate::domain::generate_item_id(&item.title);
                            minted += 1;
                        }
                    }
                }
                debug!(minted, "chat: ensured ids on trip update days");
            }
        }
        Ok(reply)
    }
}

#[async_trait]
impl ConversationClient for HttpConversationClient {
    async fn send_message(&self, request: ChatRequest) -> Result<ChatReply, ChatError> {
        let url = format!("{}/v1/chat", self.base_url);
        let body = self.build_request_body(&request)?;

        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "chat: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    let error = ChatError::Network(e);
                    if !error.is_retryable() {
                        return Err(error);
                    }
                    last_error = Some(error);
                    continue;
                }
            };

            let status = response.status().as_u16();
            let text = response.text().await.map_err(ChatError::Network)?;

            if status >= 400 {
                let error = ChatError::ApiError {
                    status,
                    message: text,
                };
                if !is_retryable_status(status) {
                    return Err(error);
                }
                last_error = Some(error);
                continue;
            }

            return self.parse_reply(&text);
        }

        Err(last_error.unwrap_or_else(|| ChatError::Timeout(Duration::from_millis(INITIAL_BACKOFF_MS))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable_status() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(503));
        assert!(is_retryable_status(529));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(401));
    }

    fn bare_client() -> HttpConversationClient {
        HttpConversationClient {
            model: "test-model".to_string(),
            api_key: "key".to_string(),
            base_url: "http://localhost:0".to_string(),
            http: Client::new(),
            max_tokens: 4096,
        }
    }

    #[test]
    fn test_parse_reply_mints_missing_ids() {
        let client = bare_client();
        let body = r#"{
            "message": "Here is a day in Kyoto.",
            "trip": {
                "destination": "Kyoto",
                "days": [{
                    "date": "2025-06-01",
                    "location": "Kyoto",
                    "items": [{ "title": "Fushimi Inari", "type": "sight" }]
                }]
            }
        }"#;

        let reply = client.parse_reply(body).unwrap();
        let trip = reply.trip.unwrap();
        assert!(!trip.days[0].items[0].id.is_empty());
        assert!(!trip.id.is_empty());
    }

    #[test]
    fn test_parse_reply_keeps_existing_ids() {
        let client = bare_client();
        let body = r#"{
            "message": "Tweaked it.",
            "tripUpdate": {
                "days": [{
                    "date": "2025-06-01",
                    "location": "Kyoto",
                    "items": [
                        { "id": "keep-me", "title": "Fushimi Inari", "type": "sight" },
                        { "title": "Nishiki Market", "type": "food" }
                    ]
                }]
            }
        }"#;

        let reply = client.parse_reply(body).unwrap();
        let days = reply.trip_update.unwrap().days.unwrap();
        assert_eq!(days[0].items[0].id, "keep-me");
        assert!(!days[0].items[1].id.is_empty());
    }

    #[test]
    fn test_parse_reply_malformed() {
        let client = bare_client();
        let err = client.parse_reply("this is not json").unwrap_err();
        assert!(matches!(err, ChatError::MalformedReply(_)));
        assert!(!err.is_retryable());
    }
}
