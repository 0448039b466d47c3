//! Core library for the weather lookup proxy and its search UI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The upstream geocoding/weather provider abstraction
//! - Shared domain models (place candidates, weather snapshots)
//! - Query classification and theme derivation
//! - A typed client for the proxy endpoints
//! - The search UI state machine and its controller
//!
//! It is used by `weather-server` and `weather-cli`.

pub mod client;
pub mod config;
pub mod model;
pub mod provider;
pub mod query;
pub mod search;
pub mod theme;

pub use client::{ClientError, ProxyClient, SearchBackend};
pub use config::{Config, CorsPolicy, OriginDecision};
pub use model::{PlaceCandidate, PostalLocation, WeatherSnapshot};
pub use provider::{WeatherProvider, provider_from_config};
pub use query::{LocationQuery, QueryMode};
pub use theme::Theme;
