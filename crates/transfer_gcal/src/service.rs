// --- File: crates/transfer_gcal/src/service.rs ---
//! Google Calendar implementation of [`CalendarService`].

use chrono::Utc;
use google_calendar3::api::{Event, EventDateTime};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use transfer_common::services::{
    BoxFuture, CalendarEvent, CalendarService, CalendarServiceError, CreatedEvent,
};
use transfer_config::GcalConfig;

use crate::auth::{create_calendar_hub, HubType, ServiceAccountCredentials, CALENDAR_SCOPE};

/// Google Calendar service implementation.
///
/// The hub is built on first use. A failed build is not cached; the next
/// call tries again.
pub struct GoogleCalendarService {
    config: GcalConfig,
    hub: OnceCell<Arc<HubType>>,
}

impl GoogleCalendarService {
    pub fn new(config: GcalConfig) -> Self {
        Self {
            config,
            hub: OnceCell::new(),
        }
    }

    async fn hub(&self) -> Result<Arc<HubType>, CalendarServiceError> {
        self.hub
            .get_or_try_init(|| async {
                let credentials = ServiceAccountCredentials::from_config(&self.config)
                    .map_err(|e| CalendarServiceError::AuthConfiguration(e.to_string()))?;
                info!(
                    "Authorizing calendar access as {}",
                    credentials.client_email()
                );
                create_calendar_hub(&credentials)
                    .await
                    .map(Arc::new)
                    .map_err(|e| CalendarServiceError::AuthConfiguration(e.to_string()))
            })
            .await
            .map(Arc::clone)
    }
}

impl CalendarService for GoogleCalendarService {
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CreatedEvent, CalendarServiceError> {
        let calendar_id = calendar_id.to_string();

        Box::pin(async move {
            let hub = self.hub().await?;
            let requested_id = event.event_id.clone();
            let new_event = to_google_event(event);

            match hub
                .events()
                .insert(new_event, &calendar_id)
                .add_scope(CALENDAR_SCOPE)
                .doit()
                .await
            {
                Ok((_response, created)) => Ok(CreatedEvent {
                    event_id: created.id.or(requested_id).unwrap_or_default(),
                    html_link: created.html_link,
                    replayed: false,
                }),
                Err(e) if is_conflict(&e) => {
                    let Some(event_id) = requested_id else {
                        return Err(CalendarServiceError::Upstream(upstream_message(&e)));
                    };
                    debug!("Event {} already exists, fetching it", event_id);
                    let (_response, existing) = hub
                        .events()
                        .get(&calendar_id, &event_id)
                        .add_scope(CALENDAR_SCOPE)
                        .doit()
                        .await
                        .map_err(|e| CalendarServiceError::Upstream(upstream_message(&e)))?;
                    Ok(CreatedEvent {
                        event_id: existing.id.unwrap_or(event_id),
                        html_link: existing.html_link,
                        replayed: true,
                    })
                }
                Err(e) => {
                    warn!("Google Calendar insert failed: {}", e);
                    Err(CalendarServiceError::Upstream(upstream_message(&e)))
                }
            }
        })
    }
}

fn to_google_event(event: CalendarEvent) -> Event {
    let time_zone = event.time_zone().to_string();
    Event {
        id: event.event_id,
        summary: Some(event.summary),
        description: Some(event.description),
        location: Some(event.location),
        color_id: Some(event.color_id),
        start: Some(EventDateTime {
            date_time: Some(event.start.with_timezone(&Utc)),
            time_zone: Some(time_zone.clone()),
            ..Default::default()
        }),
        end: Some(EventDateTime {
            date_time: Some(event.end.with_timezone(&Utc)),
            time_zone: Some(time_zone),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn is_conflict(err: &google_calendar3::Error) -> bool {
    match err {
        google_calendar3::Error::BadRequest(body) => {
            body.pointer("/error/code").and_then(Value::as_u64) == Some(409)
        }
        google_calendar3::Error::Failure(response) => response.status().as_u16() == 409,
        _ => false,
    }
}

/// The provider's own error message when it sent one.
fn upstream_message(err: &google_calendar3::Error) -> String {
    match err {
        google_calendar3::Error::BadRequest(body) => body
            .pointer("/error/message")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| err.to_string()),
        _ => err.to_string(),
    }
}

/// In-memory calendar for tests.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock calendar service for testing.
    #[derive(Default)]
    pub struct MockCalendarService {
        events: Mutex<HashMap<String, Vec<(String, CalendarEvent)>>>,
        failure: Option<CalendarServiceError>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    impl MockCalendarService {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every call fails with `err`.
        pub fn failing(err: CalendarServiceError) -> Self {
            Self {
                failure: Some(err),
                ..Self::default()
            }
        }

        /// Every call waits `delay` before answering.
        pub fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::default()
            }
        }

        /// Number of `create_event` calls received, failed ones included.
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Events stored in `calendar_id`, in insertion order.
        pub fn events(&self, calendar_id: &str) -> Vec<CalendarEvent> {
            self.events
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(calendar_id)
                .map(|events| events.iter().map(|(_, event)| event.clone()).collect())
                .unwrap_or_default()
        }
    }

    fn html_link(event_id: &str, calendar_id: &str) -> String {
        let eid = URL_SAFE_NO_PAD.encode(format!("{} {}", event_id, calendar_id));
        format!("https://www.google.com/calendar/event?eid={}", eid)
    }

    impl CalendarService for MockCalendarService {
        fn create_event(
            &self,
            calendar_id: &str,
            event: CalendarEvent,
        ) -> BoxFuture<'_, CreatedEvent, CalendarServiceError> {
            let calendar_id = calendar_id.to_string();

            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if let Some(delay) = self.delay {
                    tokio::time::sleep(delay).await;
                }
                if let Some(err) = &self.failure {
                    return Err(err.clone());
                }

                let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
                let calendar = events.entry(calendar_id.clone()).or_default();

                if let Some(requested) = &event.event_id {
                    if calendar.iter().any(|(id, _)| id == requested) {
                        return Ok(CreatedEvent {
                            event_id: requested.clone(),
                            html_link: Some(html_link(requested, &calendar_id)),
                            replayed: true,
                        });
                    }
                }

                let event_id = event
                    .event_id
                    .clone()
                    .unwrap_or_else(|| format!("mock{}", uuid::Uuid::new_v4().simple()));
                calendar.push((event_id.clone(), event));

                Ok(CreatedEvent {
                    html_link: Some(html_link(&event_id, &calendar_id)),
                    event_id,
                    replayed: false,
                })
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn event() -> CalendarEvent {
        let tz = chrono_tz::Europe::Lisbon;
        let start = tz.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        CalendarEvent {
            event_id: Some("tr0123456789abcdef0123456789abcdef".into()),
            summary: "Transfer: Ana - A → B".into(),
            description: "Cliente: Ana".into(),
            location: "Vila do Conde".into(),
            color_id: "5".into(),
            start,
            end: start + chrono::Duration::hours(1),
        }
    }

    #[test]
    fn test_google_event_carries_zone_and_colour() {
        let google = to_google_event(event());
        assert_eq!(google.id.as_deref(), Some("tr0123456789abcdef0123456789abcdef"));
        assert_eq!(google.color_id.as_deref(), Some("5"));
        assert_eq!(google.location.as_deref(), Some("Vila do Conde"));
        let start = google.start.unwrap();
        assert_eq!(start.time_zone.as_deref(), Some("Europe/Lisbon"));
        assert_eq!(
            start.date_time.unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
        );
        let end = google.end.unwrap();
        assert_eq!(
            end.date_time.unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_upstream_message_prefers_provider_text() {
        let err = google_calendar3::Error::BadRequest(json!({
            "error": { "code": 403, "message": "Rate Limit Exceeded" }
        }));
        assert_eq!(upstream_message(&err), "Rate Limit Exceeded");
        assert!(!is_conflict(&err));
    }

    #[test]
    fn test_conflict_is_detected() {
        let err = google_calendar3::Error::BadRequest(json!({
            "error": { "code": 409, "message": "The requested identifier already exists." }
        }));
        assert!(is_conflict(&err));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_every_call() {
        let service = GoogleCalendarService::new(GcalConfig::default());
        for _ in 0..2 {
            let err = service.create_event("primary", event()).await.unwrap_err();
            assert!(matches!(err, CalendarServiceError::AuthConfiguration(_)));
        }
    }

    #[tokio::test]
    async fn test_mock_replays_existing_id() {
        let service = mock::MockCalendarService::new();
        let first = service.create_event("primary", event()).await.unwrap();
        let second = service.create_event("primary", event()).await.unwrap();
        assert!(!first.replayed);
        assert!(second.replayed);
        assert_eq!(first.event_id, second.event_id);
        assert_eq!(service.events("primary").len(), 1);
        assert_eq!(service.call_count(), 2);
    }
}
