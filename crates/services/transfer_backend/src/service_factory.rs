// --- File: crates/services/transfer_backend/src/service_factory.rs ---
use std::sync::Arc;
use tracing::{info, warn};
use transfer_common::services::CalendarService;
use transfer_config::AppConfig;
use transfer_gcal::auth::ServiceAccountCredentials;
use transfer_gcal::logic::calendar_id;
use transfer_gcal::service::GoogleCalendarService;

/// Builds the calendar service used by the booking endpoint.
///
/// Bad credentials do not stop the server: they are reported here and
/// again on every booking request until fixed.
pub fn calendar_service(config: &AppConfig) -> Arc<dyn CalendarService> {
    match ServiceAccountCredentials::from_config(&config.gcal) {
        Ok(credentials) => info!(
            "Calendar bookings go to '{}' as {}",
            calendar_id(&config.gcal),
            credentials.client_email()
        ),
        Err(e) => warn!("Calendar service account is not usable: {}", e),
    }
    Arc::new(GoogleCalendarService::new(config.gcal.clone()))
}
