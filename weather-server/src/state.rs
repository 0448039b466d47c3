use std::sync::Arc;

use weather_core::{Config, CorsPolicy, WeatherProvider, provider_from_config};

/// Shared, read-only state for the proxy handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub provider: Arc<dyn WeatherProvider>,
    /// Country context for every postal-code lookup.
    pub postal_country: Arc<str>,
    pub cors: Arc<CorsPolicy>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        postal_country: &str,
        cors: CorsPolicy,
    ) -> Self {
        Self { provider, postal_country: Arc::from(postal_country), cors: Arc::new(cors) }
    }

    /// Build state from config. Fails when no API key is configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;
        Ok(Self::new(provider, &config.postal_country, config.server.cors.clone()))
    }
}
