// File: crates/transfer_gcal/src/handlers.rs
use axum::{body::Bytes, extract::State, response::Json};
use chrono_tz::Tz;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use transfer_common::booking::{BookingResponse, FormSchema, RawBooking};
use transfer_common::error::BookingError;
use transfer_common::services::CalendarService;
use transfer_config::AppConfig;

use crate::logic::{self, calendar_id, parse_time_zone};

pub const CREATED_MESSAGE: &str = "Booking created successfully";

// Shared state needed by the booking handler
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub calendar: Arc<dyn CalendarService>,
    pub schema: Arc<FormSchema>,
}

impl BookingState {
    pub fn new(config: Arc<AppConfig>, calendar: Arc<dyn CalendarService>) -> Self {
        Self {
            config,
            calendar,
            schema: Arc::new(FormSchema::transfer()),
        }
    }

    pub fn time_zone(&self) -> Tz {
        parse_time_zone(&self.config.booking.time_zone)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.booking.request_timeout_secs)
    }
}

/// Validates a booking and inserts it into the operator's calendar.
///
/// The body is read leniently: anything that is not a JSON object is
/// treated as an empty booking and rejected by validation.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/create-booking", // Path relative to /api
    responses(
        (status = 200, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Missing or invalid fields", body = BookingResponse),
        (status = 405, description = "Method not allowed", body = BookingResponse),
        (status = 500, description = "Calendar error", body = BookingResponse)
    ),
    tag = "Booking"
))]
pub async fn create_booking_handler(
    State(state): State<Arc<BookingState>>,
    body: Bytes,
) -> Result<Json<BookingResponse>, BookingError> {
    let payload: Value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|e| {
            debug!("Booking body is not valid JSON: {}", e);
            Value::Null
        })
    };

    let booking = state
        .schema
        .validate(&RawBooking::from_json(&payload))
        .inspect_err(|e| info!("Rejected booking: {}", e))?;

    info!(
        "Booking request for {} at {}",
        booking.name, booking.date_time
    );

    let created = logic::create_booking(
        state.calendar.as_ref(),
        calendar_id(&state.config.gcal),
        state.time_zone(),
        state.request_timeout(),
        &booking,
    )
    .await?;

    Ok(Json(BookingResponse::created(
        CREATED_MESSAGE,
        created.event_id,
        created.html_link,
    )))
}
