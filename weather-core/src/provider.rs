use crate::{Config, model::PostalLocation, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use serde_json::Value;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Upper bound on free-text geocoding results.
pub const DIRECT_SEARCH_LIMIT: u8 = 5;

/// Upstream geocoding and current-weather source.
///
/// Payloads that the proxy forwards verbatim are returned as raw JSON so
/// nothing the provider sends is lost on the way through.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Direct city search. Returns the provider's array of places.
    async fn search_places(&self, query: &str, limit: u8) -> anyhow::Result<Value>;

    /// Postal-code lookup within `country`.
    async fn lookup_postal_code(&self, code: &str, country: &str)
    -> anyhow::Result<PostalLocation>;

    /// Current conditions at the given coordinates, metric units.
    async fn current_weather(&self, lat: &str, lon: &str) -> anyhow::Result<Value>;
}

/// Construct the upstream provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    Ok(Arc::new(OpenWeatherProvider::new(api_key.to_owned())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let cfg = Config { api_key: Some("KEY".into()), ..Config::default() };
        assert!(provider_from_config(&cfg).is_ok());
    }
}
