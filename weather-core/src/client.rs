//! Typed client for the `/location` and `/weather` proxy endpoints.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use thiserror::Error;

use crate::{
    model::{PlaceCandidate, WeatherSnapshot},
    query::LocationQuery,
};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Proxy returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Where the search UI gets its data from.
#[async_trait]
pub trait SearchBackend: Send + Sync + Debug {
    async fn suggestions(&self, query: &LocationQuery) -> Result<Vec<PlaceCandidate>, ClientError>;

    async fn weather(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ProxyClient {
    base_url: String,
    http: Client,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), http: Client::new() }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let res = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status { status, message: error_message(&body) });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl SearchBackend for ProxyClient {
    async fn suggestions(&self, query: &LocationQuery) -> Result<Vec<PlaceCandidate>, ClientError> {
        let (key, value) = query.as_param();
        tracing::debug!(param = key, value, "fetching location suggestions");
        self.get_json("/location", &[(key, value)]).await
    }

    async fn weather(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, ClientError> {
        let (lat, lon) = (lat.to_string(), lon.to_string());
        tracing::debug!(%lat, %lon, "fetching weather");
        self.get_json("/weather", &[("lat", lat.as_str()), ("lon", lon.as_str())]).await
    }
}

/// Pull the `error` field out of a proxy error body, if there is one.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
