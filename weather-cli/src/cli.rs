use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use std::path::PathBuf;
use weather_core::{
    Config, LocationQuery, ProxyClient, SearchBackend,
    search::{UiError, WeatherPanel},
    theme::Theme,
};

use crate::{render::ThemeScope, session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookup CLI")]
pub struct Cli {
    /// Config file. Defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the upstream API key and postal-code country.
    Configure {
        /// API key; prompted for when absent.
        #[arg(long)]
        api_key: Option<String>,

        /// Country context for postal-code lookups, e.g. "AU".
        #[arg(long)]
        country: Option<String>,
    },

    /// Interactive search with suggestions.
    Search {
        /// Proxy base URL; defaults to `client.base_url` from the config.
        #[arg(long)]
        server: Option<String>,
    },

    /// Show weather for the first place matching a city name or postal code.
    Show {
        /// City name or postal code.
        query: String,

        /// Proxy base URL; defaults to `client.base_url` from the config.
        #[arg(long)]
        server: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        match self.command {
            Command::Configure { api_key, country } => {
                configure(config, self.config, api_key, country).await
            }
            Command::Search { server } => {
                let base_url = server.unwrap_or_else(|| config.client.base_url.clone());
                session::run(ProxyClient::new(&base_url), config.client.debounce()).await
            }
            Command::Show { query, server } => {
                let base_url = server.unwrap_or_else(|| config.client.base_url.clone());
                show(&ProxyClient::new(&base_url), &query).await
            }
        }
    }
}

async fn configure(
    mut config: Config,
    path: Option<PathBuf>,
    api_key: Option<String>,
    country: Option<String>,
) -> anyhow::Result<()> {
    let api_key = match api_key {
        Some(key) => key,
        None => {
            tokio::task::spawn_blocking(|| {
                Password::new("OpenWeather API key:")
                    .without_confirmation()
                    .prompt()
            })
            .await??
        }
    };

    let country = match country {
        Some(country) => country,
        None => {
            let current = config.postal_country.clone();
            tokio::task::spawn_blocking(move || {
                Text::new("Postal code country:").with_default(&current).prompt()
            })
            .await??
        }
    };

    config.api_key = Some(api_key.trim().to_string());
    config.postal_country = country.trim().to_uppercase();

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}

async fn show(client: &ProxyClient, input: &str) -> anyhow::Result<()> {
    let query = LocationQuery::from_input(input);
    let places = client
        .suggestions(&query)
        .await
        .context(UiError::SuggestionsFailed.to_string())?;

    let place = places.first().ok_or_else(|| anyhow!(UiError::NoMatch))?;

    let snapshot = client
        .weather(place.lat, place.lon)
        .await
        .context(UiError::WeatherFailed.to_string())?;
    let panel =
        WeatherPanel::from_snapshot(&snapshot).ok_or_else(|| anyhow!(UiError::WeatherFailed))?;

    let scope = ThemeScope::new(Some(Theme::from_description(&panel.description)));
    println!("{}", place.label());
    scope.print_panel(&panel);

    Ok(())
}
