use axum::{
    extract::{Request, State},
    http::{
        HeaderValue, Method, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
        },
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use weather_core::OriginDecision;

use crate::{error::ApiError, state::AppState};

const ALLOW_METHODS: &str = "GET, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";

/// Apply the configured cross-origin policy.
///
/// Runs before the handlers, so a rejected origin gets 403 even when its
/// parameters are also missing. Preflight requests are answered here.
pub async fn apply_cors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let allow_origin = match state.cors.decide(origin.as_deref()) {
        OriginDecision::Deny => {
            tracing::debug!(origin = origin.as_deref(), "rejecting unlisted origin");
            return ApiError::OriginDenied.into_response();
        }
        OriginDecision::Allow(value) => Some(value),
        OriginDecision::AllowWithoutHeader => None,
    };

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    if let Some(value) = allow_origin {
        if value != "*" {
            headers.insert(VARY, HeaderValue::from_static("origin"));
        }
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
    }
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));

    response
}
