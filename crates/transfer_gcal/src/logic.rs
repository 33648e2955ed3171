// --- File: crates/transfer_gcal/src/logic.rs ---
//! Turns a validated booking into a calendar event and inserts it.

use chrono::Duration as ChronoDuration;
use chrono_tz::Tz;
use std::time::Duration;
use tracing::{debug, info, warn};
use transfer_common::booking::{BookingField, BookingRequest, ValidationError};
use transfer_common::error::BookingError;
use transfer_common::logging::log_result;
use transfer_common::services::{CalendarEvent, CalendarService, CreatedEvent};
use transfer_config::GcalConfig;
use uuid::Uuid;

/// Colour tag applied to every booking (Google's "banana").
pub const EVENT_COLOR_ID: &str = "5";

/// Fixed length of a booked transfer.
pub const BOOKING_DURATION_SECS: i64 = 3600;

const DEFAULT_CALENDAR_ID: &str = "primary";
const DEFAULT_TIME_ZONE: Tz = chrono_tz::Europe::Lisbon;

/// Parses an IANA zone name, falling back to Europe/Lisbon.
pub fn parse_time_zone(name: &str) -> Tz {
    name.trim().parse::<Tz>().unwrap_or_else(|_| {
        warn!(
            "Unknown time zone '{}', using {}",
            name,
            DEFAULT_TIME_ZONE.name()
        );
        DEFAULT_TIME_ZONE
    })
}

/// Target calendar; `primary` when none is configured.
pub fn calendar_id(config: &GcalConfig) -> &str {
    match config.calendar_id.trim() {
        "" => DEFAULT_CALENDAR_ID,
        id => id,
    }
}

/// Deterministic event id for a client request id.
///
/// Calendar ids must use base32hex characters (`a-v`, `0-9`); a prefixed
/// simple-format UUID satisfies that.
pub fn event_id_for(request_id: &Uuid) -> String {
    format!("tr{}", request_id.simple())
}

pub fn event_summary(booking: &BookingRequest) -> String {
    format!(
        "Transfer: {} - {} → {}",
        booking.name, booking.meeting_location, booking.destination
    )
}

/// Multi-line description the driver reads on the calendar entry.
pub fn event_description(booking: &BookingRequest, start: &chrono::DateTime<Tz>) -> String {
    let mut lines = vec![format!("Cliente: {}", booking.name)];
    if let Some(passengers) = booking.passenger_count {
        lines.push(format!("Passageiros: {}", passengers));
    }
    lines.push(format!("Local de Encontro: {}", booking.meeting_location));
    lines.push(format!("Destino: {}", booking.destination));
    lines.push(format!("Data/Hora: {}", start.format("%d/%m/%Y %H:%M")));
    if let Some(bags) = booking.number_of_bags {
        lines.push(format!("Malas: {}", bags));
    }
    lines.push(format!("Telefone: {}", booking.phone));
    lines.join("\n")
}

/// Builds the event for `booking`, starting at its date-time in `tz` and
/// lasting [`BOOKING_DURATION_SECS`].
pub fn build_calendar_event(
    booking: &BookingRequest,
    tz: Tz,
) -> Result<CalendarEvent, ValidationError> {
    let start = booking.scheduled_at(tz)?;
    let end = start
        .checked_add_signed(ChronoDuration::seconds(BOOKING_DURATION_SECS))
        .ok_or_else(|| ValidationError::invalid(BookingField::DateTime))?;

    Ok(CalendarEvent {
        event_id: booking.request_id.as_ref().map(event_id_for),
        summary: event_summary(booking),
        description: event_description(booking, &start),
        location: booking.meeting_location.clone(),
        color_id: EVENT_COLOR_ID.to_string(),
        start,
        end,
    })
}

/// Inserts the booking into `calendar_id`, bounded by `timeout`.
pub async fn create_booking(
    calendar: &dyn CalendarService,
    calendar_id: &str,
    tz: Tz,
    timeout: Duration,
    booking: &BookingRequest,
) -> Result<CreatedEvent, BookingError> {
    let event = build_calendar_event(booking, tz)?;
    debug!(
        "Creating event '{}' from {} to {} ({})",
        event.summary,
        event.start.to_rfc3339(),
        event.end.to_rfc3339(),
        event.time_zone()
    );

    let inserted = match tokio::time::timeout(timeout, calendar.create_event(calendar_id, event)).await
    {
        Ok(result) => result.map_err(BookingError::from),
        Err(_) => Err(BookingError::Timeout(timeout.as_secs())),
    };
    let created = log_result(inserted, "Calendar insert completed", "Calendar insert failed")?;

    if created.replayed {
        info!("Booking {} already existed, returning it", created.event_id);
    } else {
        info!("Booking created with event id {}", created.event_id);
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn booking() -> BookingRequest {
        BookingRequest {
            name: "Ana Silva".into(),
            phone: "351912345678".into(),
            meeting_location: "Vila do Conde".into(),
            destination: "Aeroporto OPO".into(),
            date_time: "2025-06-01T10:00".into(),
            number_of_bags: Some(1),
            passenger_count: None,
            request_id: None,
        }
    }

    #[test]
    fn test_event_is_one_hour_in_local_zone() {
        let event = build_calendar_event(&booking(), chrono_tz::Europe::Lisbon).unwrap();
        let expected = chrono_tz::Europe::Lisbon
            .with_ymd_and_hms(2025, 6, 1, 10, 0, 0)
            .unwrap();
        assert_eq!(event.start, expected);
        assert_eq!(event.end - event.start, ChronoDuration::hours(1));
        assert_eq!(event.time_zone(), "Europe/Lisbon");
        assert_eq!(event.color_id, "5");
        assert_eq!(event.location, "Vila do Conde");
        assert_eq!(event.event_id, None);
    }

    #[test]
    fn test_summary_and_description() {
        let event = build_calendar_event(&booking(), chrono_tz::Europe::Lisbon).unwrap();
        assert_eq!(
            event.summary,
            "Transfer: Ana Silva - Vila do Conde → Aeroporto OPO"
        );
        assert_eq!(
            event.description,
            "Cliente: Ana Silva\n\
             Local de Encontro: Vila do Conde\n\
             Destino: Aeroporto OPO\n\
             Data/Hora: 01/06/2025 10:00\n\
             Malas: 1\n\
             Telefone: 351912345678"
        );
    }

    #[test]
    fn test_description_lists_passengers_when_present() {
        let mut booking = booking();
        booking.passenger_count = Some(3);
        booking.number_of_bags = None;
        let event = build_calendar_event(&booking, chrono_tz::Europe::Lisbon).unwrap();
        assert!(event.description.contains("Passageiros: 3"));
        assert!(!event.description.contains("Malas"));
    }

    #[test]
    fn test_offset_time_is_converted_to_zone() {
        let mut booking = booking();
        booking.date_time = "2025-06-01T09:00:00Z".into();
        let event = build_calendar_event(&booking, chrono_tz::Europe::Lisbon).unwrap();
        // Lisbon is UTC+1 in summer
        assert_eq!(event.start.hour(), 10);
    }

    #[test]
    fn test_time_in_dst_gap_is_invalid() {
        let mut booking = booking();
        // Clocks jump from 01:00 to 02:00 in Lisbon on this date
        booking.date_time = "2025-03-30T01:30".into();
        let err = build_calendar_event(&booking, chrono_tz::Europe::Lisbon).unwrap_err();
        assert_eq!(err.invalid_fields, vec!["dateTime"]);
    }

    #[test]
    fn test_request_id_becomes_event_id() {
        let mut booking = booking();
        let id = Uuid::parse_str("6f1c2a9e-0b7d-4c55-9e3a-2d4b8f7a1c00").unwrap();
        booking.request_id = Some(id);
        let event = build_calendar_event(&booking, chrono_tz::Europe::Lisbon).unwrap();
        let event_id = event.event_id.unwrap();
        assert_eq!(event_id, "tr6f1c2a9e0b7d4c559e3a2d4b8f7a1c00");
        assert!(event_id
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='v').contains(&c)));
    }

    #[test]
    fn test_calendar_id_defaults_to_primary() {
        let mut config = GcalConfig::default();
        config.calendar_id = "  ".into();
        assert_eq!(calendar_id(&config), "primary");
        config.calendar_id = "driver@group.calendar.google.com".into();
        assert_eq!(calendar_id(&config), "driver@group.calendar.google.com");
    }

    #[test]
    fn test_parse_time_zone() {
        assert_eq!(parse_time_zone("Europe/Berlin"), chrono_tz::Europe::Berlin);
        assert_eq!(parse_time_zone("Mars/Olympus"), chrono_tz::Europe::Lisbon);
    }
}
