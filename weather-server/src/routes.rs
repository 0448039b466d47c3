use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use weather_core::{LocationQuery, PlaceCandidate, provider::DIRECT_SEARCH_LIMIT};

use crate::{cors::apply_cors, error::ApiError, state::AppState};

/// Geocoding endpoint path.
pub const LOCATION_PATH: &str = "/location";
/// Current weather endpoint path.
pub const WEATHER_PATH: &str = "/weather";

/// Build the proxy router with the CORS policy applied to both endpoints.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(LOCATION_PATH, get(location))
        .route(WEATHER_PATH, get(weather))
        .layer(middleware::from_fn_with_state(state.clone(), apply_cors))
        .with_state(state)
}

/// Raw query pairs. Repeated parameters are allowed; the first value wins.
type QueryPairs = Vec<(String, String)>;

/// First non-empty value of `name`.
fn first_param<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, value)| key == name && !value.is_empty())
        .map(|(_, value)| value.as_str())
}

async fn location(
    State(st): State<AppState>,
    params: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Ok(Query(pairs)) = params else {
        return Err(ApiError::MissingQuery);
    };
    let query = LocationQuery::from_params(first_param(&pairs, "q"), first_param(&pairs, "zip"))
        .ok_or(ApiError::MissingQuery)?;

    match query {
        LocationQuery::PostalCode(code) => {
            tracing::info!(zip = %code, country = %st.postal_country, "postal code lookup");
            let location = st
                .provider
                .lookup_postal_code(&code, &st.postal_country)
                .await
                .map_err(|e| {
                    tracing::warn!(error = ?e, "postal code lookup failed");
                    ApiError::LocationFetch
                })?;

            Ok(Json(vec![PlaceCandidate::from_postal_code(&code, &location)]).into_response())
        }
        LocationQuery::Text(text) => {
            tracing::info!(q = %text, "place search");
            let places = st
                .provider
                .search_places(&text, DIRECT_SEARCH_LIMIT)
                .await
                .map_err(|e| {
                    tracing::warn!(error = ?e, "place search failed");
                    ApiError::LocationFetch
                })?;

            Ok(Json(places).into_response())
        }
    }
}

async fn weather(
    State(st): State<AppState>,
    params: Result<Query<QueryPairs>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Ok(Query(pairs)) = params else {
        return Err(ApiError::MissingCoordinates);
    };
    let (Some(lat), Some(lon)) = (first_param(&pairs, "lat"), first_param(&pairs, "lon")) else {
        return Err(ApiError::MissingCoordinates);
    };

    tracing::info!(%lat, %lon, "current weather");
    let payload = st.provider.current_weather(lat, lon).await.map_err(|e| {
        tracing::warn!(error = ?e, "current weather failed");
        ApiError::WeatherFetch
    })?;

    Ok(Json(payload).into_response())
}
