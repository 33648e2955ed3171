// --- File: crates/transfer_gcal/src/routes.rs ---

use axum::{routing::post, Router};
use std::sync::Arc;
use transfer_common::http::{method_not_allowed, preflight, with_cors};
use transfer_common::services::CalendarService;
use transfer_config::AppConfig;

use crate::handlers::{create_booking_handler, BookingState};

/// Router for the booking endpoint. Only POST and OPTIONS are served;
/// other methods get 405 with the error envelope.
pub fn routes(config: Arc<AppConfig>, calendar: Arc<dyn CalendarService>) -> Router {
    let cors = config.cors.clone();
    let state = Arc::new(BookingState::new(config, calendar));

    let router = Router::new()
        .route(
            "/create-booking",
            post(create_booking_handler)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .with_state(state);

    with_cors(router, &cors, "POST, OPTIONS")
}
