// --- File: crates/transfer_common/src/routes.rs ---
use axum::{routing::get, Router};
use std::sync::Arc;
use transfer_config::AppConfig;

use crate::handlers::health_handler;
use crate::http::{method_not_allowed, preflight, with_cors};

/// Routes shared by every deployment: currently the health check.
pub fn routes(config: Arc<AppConfig>) -> Router {
    let router = Router::new().route(
        "/health",
        get(health_handler)
            .options(preflight)
            .fallback(method_not_allowed),
    );
    with_cors(router, &config.cors, "GET, OPTIONS")
}
