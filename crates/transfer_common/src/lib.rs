// --- File: crates/transfer_common/src/lib.rs ---

// Declare modules within this crate
pub mod booking;   // Booking schema, validation and wire envelopes
pub mod error;     // Error handling
pub mod handlers;  // HTTP request handlers
pub mod http;      // HTTP utilities
pub mod logging;   // Logging utilities
pub mod routes;    // Route definitions
pub mod services;  // Service abstractions

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

pub use booking::{
    BookingField, BookingRequest, BookingResponse, BookingTime, FieldKind, FieldRule, FormSchema,
    RawBooking, ValidationError,
};

pub use error::{BookingError, HttpStatusCode};

pub use http::{method_not_allowed, preflight, route_fallback, with_cors, IntoHttpResponse};

pub use logging::{init, init_with_level, log_error, log_result};
