// --- File: crates/transfer_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! The booking endpoint talks to the calendar only through [`CalendarService`],
//! so handlers can be exercised against an in-memory calendar.

use chrono::DateTime;
use chrono_tz::Tz;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Errors a calendar backend can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarServiceError {
    /// Credentials are absent or malformed. Not transient.
    #[error("{0}")]
    AuthConfiguration(String),
    /// The provider rejected or failed the call (network, auth, quota).
    #[error("{0}")]
    Upstream(String),
}

/// A trait for calendar service operations.
pub trait CalendarService: Send + Sync {
    /// Inserts `event` into `calendar_id`.
    ///
    /// When `event.event_id` is set and an event with that id already
    /// exists, implementations return the existing event with
    /// `replayed = true` instead of failing.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CreatedEvent, CalendarServiceError>;
}

/// An event ready to be handed to the calendar provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    /// Caller-chosen id, used to make retries idempotent.
    pub event_id: Option<String>,
    pub summary: String,
    pub description: String,
    pub location: String,
    /// Provider colour tag used to flag bookings on the calendar.
    pub color_id: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl CalendarEvent {
    /// IANA name of the zone the event is expressed in.
    pub fn time_zone(&self) -> &'static str {
        self.start.timezone().name()
    }
}

/// Result of a successful insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEvent {
    pub event_id: String,
    pub html_link: Option<String>,
    /// The event already existed under the requested id.
    pub replayed: bool,
}
