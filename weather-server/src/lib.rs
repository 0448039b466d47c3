//! HTTP proxy for geocoding and current-weather lookups.
//!
//! Two GET endpoints forward to the upstream provider and reshape little:
//! - `/location?q=<text>` or `/location?zip=<code>`
//! - `/weather?lat=<number>&lon=<number>`

pub mod cors;
pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{LOCATION_PATH, WEATHER_PATH, router};
pub use state::AppState;
