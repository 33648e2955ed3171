// --- File: crates/transfer_common/src/http.rs ---
use axum::{
    extract::Request,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
        },
        HeaderName, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    Json, Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::warn;
use transfer_config::CorsConfig;

use crate::booking::BookingResponse;
use crate::error::{BookingError, HttpStatusCode};

/// Extension trait for BookingError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for BookingError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut body = BookingResponse::failed(self.public_message());
        if let BookingError::Validation(err) = &self {
            body.missing_fields = wire_keys(&err.missing_fields);
            body.invalid_fields = wire_keys(&err.invalid_fields);
        }

        (status_code, Json(body)).into_response()
    }
}

fn wire_keys(keys: &[&'static str]) -> Option<Vec<String>> {
    (!keys.is_empty()).then(|| keys.iter().map(|k| k.to_string()).collect())
}

/// Implement IntoResponse for BookingError to make it easier to use in Axum handlers.
impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// The cross-origin headers sent on every response of a route.
pub fn cors_headers(cors: &CorsConfig, methods: &str) -> Vec<(HeaderName, HeaderValue)> {
    let mut headers = vec![
        (ACCESS_CONTROL_ALLOW_ORIGIN, cors.allow_origin.clone()),
        (ACCESS_CONTROL_ALLOW_METHODS, methods.to_string()),
        (ACCESS_CONTROL_ALLOW_HEADERS, cors.allow_headers.join(", ")),
        (ACCESS_CONTROL_MAX_AGE, cors.max_age_secs.to_string()),
    ];
    if cors.allow_credentials {
        headers.push((ACCESS_CONTROL_ALLOW_CREDENTIALS, "true".to_string()));
    }

    headers
        .into_iter()
        .filter_map(|(name, value)| match HeaderValue::from_str(&value) {
            Ok(value) => Some((name, value)),
            Err(_) => {
                warn!("Skipping invalid CORS header value for {}", name);
                None
            }
        })
        .collect()
}

/// Attaches the CORS headers to every response of `router`, including errors.
///
/// Headers already present are left alone, so an outer call (e.g. for the
/// fallback) does not overwrite the methods advertised by an inner route.
pub fn with_cors<S>(router: Router<S>, cors: &CorsConfig, methods: &str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    cors_headers(cors, methods)
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(name, value))
        })
}

/// CORS preflight: 200, empty body. Headers come from [`with_cors`].
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Method fallback for routes that only accept their configured method.
pub async fn method_not_allowed() -> BookingError {
    BookingError::MethodNotAllowed
}

/// Fallback for unknown paths: preflight still succeeds, anything else is 404.
pub async fn route_fallback(request: Request) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    BookingError::NotFound.into_response()
}
