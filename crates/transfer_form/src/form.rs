//! Booking form controller.
//!
//! Owns the field values, runs the shared validator, submits through a
//! [`BookingApi`] and derives the outbound links on success. One submission
//! at a time per form.

use chrono_tz::Tz;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use transfer_common::booking::{
    BookingField, BookingRequest, FormSchema, RawBooking, ValidationError,
};
use transfer_config::ClientConfig;
use uuid::Uuid;

use crate::api::{ApiError, BookingApi};
use crate::links::OutboundLinks;
use crate::notify::{LinkOpener, Notifier, Toast};

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("A booking is already being submitted")]
    Busy,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// What a successful submission produced.
#[derive(Debug)]
pub struct SubmitOutcome {
    pub event_id: Option<String>,
    pub event_link: Option<String>,
    pub links: OutboundLinks,
    /// Delayed opening of the message link; resolves to whether it opened.
    pub opening: JoinHandle<bool>,
}

#[derive(Debug, Default)]
struct FormState {
    values: RawBooking,
    errors: Vec<(BookingField, String)>,
    links: Option<OutboundLinks>,
    /// Reused by retries until a submission succeeds.
    pending_request_id: Option<Uuid>,
}

pub struct BookingForm {
    schema: FormSchema,
    config: ClientConfig,
    time_zone: Tz,
    api: Arc<dyn BookingApi>,
    notifier: Arc<dyn Notifier>,
    opener: Arc<dyn LinkOpener>,
    state: Mutex<FormState>,
    busy: AtomicBool,
}

// Clears the busy flag however the submission ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl BookingForm {
    pub fn new(
        config: ClientConfig,
        api: Arc<dyn BookingApi>,
        notifier: Arc<dyn Notifier>,
        opener: Arc<dyn LinkOpener>,
    ) -> Self {
        let time_zone = config.time_zone.parse::<Tz>().unwrap_or_else(|_| {
            warn!("Unknown client time zone '{}', using Europe/Lisbon", config.time_zone);
            chrono_tz::Europe::Lisbon
        });
        Self {
            schema: FormSchema::transfer(),
            config,
            time_zone,
            api,
            notifier,
            opener,
            state: Mutex::new(FormState::default()),
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_schema(mut self, schema: FormSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_field(&self, field: BookingField, value: impl Into<String>) {
        let mut state = self.state();
        state.values.set(field, value);
        state.errors.retain(|(f, _)| *f != field);
    }

    pub fn field(&self, field: BookingField) -> Option<String> {
        self.state().values.get(field).map(String::from)
    }

    /// Messages to show next to invalid inputs after the last submit.
    pub fn field_errors(&self) -> Vec<(BookingField, String)> {
        self.state().errors.clone()
    }

    /// Links from the last successful booking, kept for manual opening.
    /// Cleared as soon as another submission starts.
    pub fn links(&self) -> Option<OutboundLinks> {
        self.state().links.clone()
    }

    /// True while a submission is in flight; the submit control is disabled.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Validates and submits the current values.
    ///
    /// Inputs are cleared on success and kept on any failure.
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmitError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SubmitError::Busy);
        }
        let guard = BusyGuard(&self.busy);

        let (booking, links) = self.prepare()?;
        info!("Submitting booking for {}", booking.date_time);

        let response = match self.api.create_booking(&booking).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Booking submission failed: {}", e);
                let reason = match &e {
                    ApiError::Rejected { message, .. } => Some(message.as_str()),
                    ApiError::Transport(_) | ApiError::InvalidResponse(_) => None,
                };
                self.notifier.notify(Toast::booking_failed(reason));
                return Err(e.into());
            }
        };

        self.notifier.notify(Toast::booking_created());
        {
            let mut state = self.state();
            state.values.clear();
            state.errors.clear();
            state.pending_request_id = None;
            state.links = Some(links.clone());
        }
        drop(guard);

        let opening = self.open_message_later(links.message.clone());
        Ok(SubmitOutcome {
            event_id: response.event_id,
            event_link: response.event_link,
            links,
            opening,
        })
    }

    // Validates the current values and attaches the retry-stable request id.
    fn prepare(&self) -> Result<(BookingRequest, OutboundLinks), ValidationError> {
        let mut state = self.state();
        state.links = None;
        let checked = self.schema.validate(&state.values).and_then(|booking| {
            OutboundLinks::for_booking(&booking, &self.config, self.time_zone)
                .map(|links| (booking, links))
        });

        match checked {
            Ok((mut booking, links)) => {
                state.errors.clear();
                let request_id = *state.pending_request_id.get_or_insert_with(Uuid::new_v4);
                booking.request_id = Some(request_id);
                Ok((booking, links))
            }
            Err(err) => {
                debug!("Form rejected locally: {}", err);
                state.errors = err.messages(&self.schema);
                Err(err)
            }
        }
    }

    fn open_message_later(&self, url: String) -> JoinHandle<bool> {
        let delay = Duration::from_millis(self.config.open_delay_ms);
        let opener = Arc::clone(&self.opener);
        let notifier = Arc::clone(&self.notifier);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let opened = opener.open(&url);
            if !opened {
                notifier.notify(Toast::popup_blocked());
            }
            opened
        })
    }
}
