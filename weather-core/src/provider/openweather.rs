use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::PostalLocation;

use super::WeatherProvider;

pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

const UNITS: &str = "metric";
const LANGUAGE: &str = "en";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, OPENWEATHER_BASE_URL)
    }

    /// Point the provider at a different host, e.g. a mock server.
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {what} JSON"))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn search_places(&self, query: &str, limit: u8) -> Result<Value> {
        let limit = limit.to_string();
        let places: Value = self
            .get_json(
                "direct geocoding",
                "/geo/1.0/direct",
                &[("q", query), ("limit", limit.as_str())],
            )
            .await?;

        if !places.is_array() {
            return Err(anyhow!("OpenWeather direct geocoding response was not an array"));
        }
        Ok(places)
    }

    async fn lookup_postal_code(&self, code: &str, country: &str) -> Result<PostalLocation> {
        let zip = format!("{code},{country}");
        self.get_json("postal code geocoding", "/geo/1.0/zip", &[("zip", zip.as_str())]).await
    }

    async fn current_weather(&self, lat: &str, lon: &str) -> Result<Value> {
        self.get_json(
            "current weather",
            "/data/2.5/weather",
            &[("lat", lat), ("lon", lon), ("units", UNITS), ("lang", LANGUAGE)],
        )
        .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
