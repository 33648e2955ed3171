// --- File: crates/transfer_form/src/lib.rs ---
//! Client side of the booking flow: the form controller, its HTTP client
//! and the deep links shown after a booking is confirmed.

pub mod api;    // Endpoint client
pub mod form;   // Form controller
pub mod links;  // Message and calendar deep links
pub mod notify; // Toasts and link opening

pub use api::{ApiError, BookingApi, HttpBookingApi};
pub use form::{BookingForm, SubmitError, SubmitOutcome};
pub use links::OutboundLinks;
pub use notify::{LinkOpener, Notifier, Toast, ToastKind};
