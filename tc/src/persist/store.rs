//! Trip persistence boundary
//!
//! The backend owns durability; the core only serializes the current trip
//! and conversation transcript at save time. No retry/backoff lives here:
//! that policy belongs to the autosaver.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::chat::ChatMessage;
use crate::config::ApiConfig;
use crate::domain::Trip;

/// Errors from the persistence backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Trip not found: {0}")]
    NotFound(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A persisted trip plus its conversation transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSnapshot {
    pub trip: Trip,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Boundary trait for trip persistence
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Persist a new trip; returns the backend-assigned id
    async fn create_trip(&self, trip: &Trip, messages: &[ChatMessage]) -> Result<String, StoreError>;

    /// Overwrite an existing trip
    async fn update_trip(&self, id: &str, trip: &Trip, messages: &[ChatMessage]) -> Result<(), StoreError>;

    /// Fetch a trip with its transcript
    async fn get_trip(&self, id: &str) -> Result<TripSnapshot, StoreError>;
}

/// REST implementation of the persistence boundary
pub struct HttpTripStore {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct CreateTripResponse {
    id: String,
}

impl HttpTripStore {
    /// Create a store from configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(StoreError::Network)?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http,
        })
    }

    fn trips_url(&self) -> String {
        format!("{}/v1/trips", self.base_url)
    }
}

#[async_trait]
impl TripStore for HttpTripStore {
    async fn create_trip(&self, trip: &Trip, messages: &[ChatMessage]) -> Result<String, StoreError> {
        let body = serde_json::json!({ "trip": trip, "messages": messages });
        let response = self.http.post(self.trips_url()).json(&body).send().await?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(StoreError::ApiError {
                status,
                message: response.text().await.unwrap_or_default(),
            });
        }

        let created: CreateTripResponse = response.json().await?;
        Ok(created.id)
    }

    async fn update_trip(&self, id: &str, trip: &Trip, messages: &[ChatMessage]) -> Result<(), StoreError> {
        let body = serde_json::json!({ "trip": trip, "messages": messages });
        let response = self
            .http
            .put(format!("{}/{}", self.trips_url(), id))
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        if status >= 400 {
            return Err(StoreError::ApiError {
                status,
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn get_trip(&self, id: &str) -> Result<TripSnapshot, StoreError> {
        let response = self.http.get(format!("{}/{}", self.trips_url(), id)).send().await?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        if status >= 400 {
            return Err(StoreError::ApiError {
                status,
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serde() {
        let snapshot = TripSnapshot {
            trip: Trip::new("Lisbon"),
            messages: vec![ChatMessage::user("plan lisbon")],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: TripSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.trip.destination, "Lisbon");
        assert_eq!(back.messages.len(), 1);
    }

    #[test]
    fn test_snapshot_messages_default() {
        let json = r#"{ "trip": { "destination": "Lisbon" } }"#;
        let snapshot: TripSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.messages.is_empty());
    }
}
