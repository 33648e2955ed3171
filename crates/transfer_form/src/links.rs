//! Deep links derived from a confirmed booking.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use transfer_common::booking::{BookingField, BookingRequest, ValidationError};
use transfer_config::ClientConfig;

const CALENDAR_TEMPLATE_URL: &str = "https://calendar.google.com/calendar/render?action=TEMPLATE";
const COMPACT_UTC: &str = "%Y%m%dT%H%M%SZ";

/// The two links offered after a successful booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundLinks {
    /// Prefilled message to the operator.
    pub message: String,
    /// "Add to my calendar" link for the customer.
    pub calendar: String,
}

impl OutboundLinks {
    pub fn for_booking(
        booking: &BookingRequest,
        config: &ClientConfig,
        tz: Tz,
    ) -> Result<Self, ValidationError> {
        let start = booking.scheduled_at(tz)?;
        let end = start
            .checked_add_signed(Duration::hours(1))
            .ok_or_else(|| ValidationError::invalid(BookingField::DateTime))?;

        Ok(Self {
            message: message_link(
                &config.messaging_host,
                &config.operator_contact,
                &message_text(booking, &start),
            ),
            calendar: calendar_link(booking, &start, &end),
        })
    }
}

/// Multi-line summary sent to the operator.
pub fn message_text(booking: &BookingRequest, start: &DateTime<Tz>) -> String {
    let mut lines = vec![
        "*Nova Reserva de Transfer*".to_string(),
        String::new(),
        format!("*Cliente:* {}", booking.name),
    ];
    if let Some(passengers) = booking.passenger_count {
        lines.push(format!("*Passageiros:* {}", passengers));
    }
    lines.push(format!("*Local de Encontro:* {}", booking.meeting_location));
    if let Some(bags) = booking.number_of_bags {
        lines.push(format!("*Malas:* {}", bags));
    }
    lines.push(format!("*Destino:* {}", booking.destination));
    lines.push(format!("*Data/Hora:* {}", start.format("%d/%m/%Y, %H:%M")));
    lines.push(format!("*Telefone:* {}", booking.phone));
    lines.join("\n")
}

/// `https://<host>/<contact>?text=<text>`
pub fn message_link(host: &str, contact: &str, text: &str) -> String {
    format!(
        "https://{}/{}?text={}",
        host.trim_end_matches('/'),
        contact.trim(),
        urlencoding::encode(text)
    )
}

pub fn calendar_link(booking: &BookingRequest, start: &DateTime<Tz>, end: &DateTime<Tz>) -> String {
    let title = format!("Transfer: {} → {}", booking.meeting_location, booking.destination);

    let mut details = vec![
        format!("Local de Encontro: {}", booking.meeting_location),
        format!("Destino: {}", booking.destination),
    ];
    if let Some(bags) = booking.number_of_bags {
        details.push(format!("Malas: {}", bags));
    }
    details.push(format!("Telefone: {}", booking.phone));

    format!(
        "{}&text={}&dates={}/{}&details={}&location={}",
        CALENDAR_TEMPLATE_URL,
        urlencoding::encode(&title),
        start.with_timezone(&Utc).format(COMPACT_UTC),
        end.with_timezone(&Utc).format(COMPACT_UTC),
        urlencoding::encode(&details.join("\n")),
        urlencoding::encode(&booking.meeting_location)
    )
}
