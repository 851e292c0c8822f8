use crate::config::toml_config::GeocodingConfig;
use crate::domain::model::Coordinates;
use crate::domain::ports::PlaceResolver;
use crate::utils::error::{FortuneError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Place name lookup through the Nominatim `/search` API.
#[derive(Debug, Clone)]
pub struct NominatimResolver {
    client: Client,
    search_url: String,
}

impl NominatimResolver {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            search_url: format!("{}/search", config.endpoint.trim_end_matches('/')),
        })
    }

    async fn search(&self, place: &str) -> Result<Option<Coordinates>> {
        tracing::debug!("Geocoding request to: {}", self.search_url);

        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        tracing::debug!("Geocoding response status: {}", response.status());
        let response = response.error_for_status()?;
        let hits: Vec<SearchHit> = response.json().await?;

        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };

        let parse = |field: &str, value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|e| FortuneError::malformed("geocoding", format!("{} '{}': {}", field, value, e)))
        };

        Ok(Some(Coordinates::new(
            parse("lat", &hit.lat)?,
            parse("lon", &hit.lon)?,
        )))
    }
}

impl PlaceResolver for NominatimResolver {
    async fn resolve(&self, place: &str) -> Option<Coordinates> {
        let place = place.trim();
        if place.is_empty() {
            tracing::debug!("Empty place name, skipping geocoding");
            return None;
        }

        match self.search(place).await {
            Ok(Some(coordinates)) => Some(coordinates),
            Ok(None) => {
                tracing::info!("No geocoding match for '{}'", place);
                None
            }
            // 逾時、連線失敗、非 2xx 都一律視為查無結果
            Err(e) => {
                tracing::warn!("Geocoding '{}' failed: {}", place, e);
                None
            }
        }
    }
}
