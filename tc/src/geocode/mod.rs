//! Geocoding boundary
//!
//! Opportunistic enrichment: items without a location get one when the
//! geocoder can find it, and stay without one when it can't. Failures are
//! swallowed and logged; enrichment never blocks trip display.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GeocodeConfig;
use crate::domain::{ItemLocation, Trip};

/// Errors that can occur during geocoding
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("No result for query: {0}")]
    NoResult(String),
}

/// Boundary trait for forward geocoding
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-text query to a point, optionally biased toward a
    /// nearby coordinate
    async fn geocode(&self, query: &str, proximity: Option<(f64, f64)>) -> Result<ItemLocation, GeocodeError>;
}

/// Geocoder talking to a forward-geocoding HTTP endpoint
pub struct HttpGeocoder {
    base_url: String,
    token: String,
    http: Client,
}

/// Wire shape of a geocoding response feature
#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    lat: f64,
    lng: f64,
    #[serde(default)]
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<GeocodeFeature>,
}

impl HttpGeocoder {
    /// Create a geocoder from configuration
    pub fn from_config(config: &GeocodeConfig) -> Result<Self, GeocodeError> {
        let token = std::env::var(&config.token_env).unwrap_or_default();
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(GeocodeError::Network)?;

        Ok(Self {
            base_url: config.base_url.clone(),
            token,
            http,
        })
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, query: &str, proximity: Option<(f64, f64)>) -> Result<ItemLocation, GeocodeError> {
        let mut request = self
            .http
            .get(format!("{}/forward", self.base_url))
            .query(&[("q", query), ("access_token", &self.token)]);

        if let Some((lat, lng)) = proximity {
            request = request.query(&[("proximity", format!("{},{}", lng, lat))]);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        if status >= 400 {
            return Err(GeocodeError::ApiError {
                status,
                message: response.text().await.unwrap_or_default(),
            });
        }

        let parsed: GeocodeResponse = response.json().await?;
        let feature = parsed
            .features
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoResult(query.to_string()))?;

        Ok(ItemLocation {
            lat: feature.lat,
            lng: feature.lng,
            address: feature.address,
        })
    }
}

/// Fill in missing item locations across the whole trip.
///
/// Lookups run concurrently and are biased toward the first already-located
/// item so results cluster around the destination. Every failure is
/// swallowed with a warning; the item simply stays without a location.
/// Returns how many items were enriched.
pub async fn enrich_trip(geocoder: &dyn Geocoder, trip: &mut Trip) -> usize {
    let proximity = trip
        .items()
        .find_map(|item| item.location.as_ref().map(|loc| (loc.lat, loc.lng)));

    let destination = trip.destination.clone();
    let targets: Vec<(usize, usize, String)> = trip
        .days
        .iter()
        .enumerate()
        .flat_map(|(day_index, day)| {
            let destination = destination.clone();
            day.items.iter().enumerate().filter_map(move |(item_index, item)| {
                if item.location.is_some() {
                    None
                } else {
                    Some((day_index, item_index, format!("{}, {}", item.title, destination)))
                }
            })
        })
        .collect();

    let lookups = targets.iter().map(|(_, _, query)| geocoder.geocode(query, proximity));
    let results = futures::future::join_all(lookups).await;

    let mut enriched = 0;
    for ((day_index, item_index, query), result) in targets.iter().zip(results) {
        match result {
            Ok(location) => {
                debug!(%query, lat = location.lat, lng = location.lng, "geocode: enriched");
                trip.days[*day_index].items[*item_index].location = Some(location);
                enriched += 1;
            }
            Err(e) => {
                warn!(%query, error = %e, "geocode: lookup failed, leaving item unlocated");
            }
        }
    }
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Day, ItemKind, ItineraryItem};
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Geocoder that succeeds for queries containing "hit"
    struct FakeGeocoder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, query: &str, _proximity: Option<(f64, f64)>) -> Result<ItemLocation, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query.contains("hit") {
                Ok(ItemLocation {
                    lat: 1.0,
                    lng: 2.0,
                    address: Some(query.to_string()),
                })
            } else {
                Err(GeocodeError::NoResult(query.to_string()))
            }
        }
    }

    fn trip_with(titles: &[&str]) -> Trip {
        let mut day = Day::new(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), "Test");
        for title in titles {
            day.items.push(ItineraryItem::new(*title, ItemKind::Sight));
        }
        Trip::new("Testville").with_day(day)
    }

    #[tokio::test]
    async fn test_enrich_fills_missing_locations() {
        let geocoder = FakeGeocoder {
            calls: AtomicUsize::new(0),
        };
        let mut trip = trip_with(&["hit one", "hit two"]);

        let enriched = enrich_trip(&geocoder, &mut trip).await;
        assert_eq!(enriched, 2);
        assert!(trip.days[0].items.iter().all(|i| i.location.is_some()));
    }

    #[tokio::test]
    async fn test_enrich_swallows_failures() {
        let geocoder = FakeGeocoder {
            calls: AtomicUsize::new(0),
        };
        let mut trip = trip_with(&["hit one", "nope"]);

        let enriched = enrich_trip(&geocoder, &mut trip).await;
        assert_eq!(enriched, 1);
        assert!(trip.days[0].items[0].location.is_some());
        assert!(trip.days[0].items[1].location.is_none());
    }

    #[tokio::test]
    async fn test_enrich_skips_already_located() {
        let geocoder = FakeGeocoder {
            calls: AtomicUsize::new(0),
        };
        let mut trip = trip_with(&["hit one"]);
        trip.days[0].items[0].location = Some(ItemLocation {
            lat: 0.0,
            lng: 0.0,
            address: None,
        });

        let enriched = enrich_trip(&geocoder, &mut trip).await;
        assert_eq!(enriched, 0);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }
}
