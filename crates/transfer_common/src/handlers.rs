// --- File: crates/transfer_common/src/handlers.rs ---
use axum::Json;
use chrono::{SecondsFormat, Utc};

use crate::booking::HealthResponse;

/// Liveness probe.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Backend is up", body = HealthResponse)
    ),
    tag = "Health"
))]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Backend is running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
