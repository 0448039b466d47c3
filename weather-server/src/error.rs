use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Everything a proxy endpoint can answer with besides success.
///
/// Upstream failures carry no detail. An invalid key, a provider outage and
/// bad coordinates all produce the same 500.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    #[error("Missing query")]
    MissingQuery,

    #[error("Missing lat/lon")]
    MissingCoordinates,

    #[error("Location fetch failed")]
    LocationFetch,

    #[error("Weather fetch failed")]
    WeatherFetch,

    #[error("Access denied: unauthorized origin")]
    OriginDenied,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingQuery | ApiError::MissingCoordinates => StatusCode::BAD_REQUEST,
            ApiError::LocationFetch | ApiError::WeatherFetch => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::OriginDenied => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::MissingQuery.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingCoordinates.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::LocationFetch.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::WeatherFetch.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::OriginDenied.status(), StatusCode::FORBIDDEN);
    }
}
