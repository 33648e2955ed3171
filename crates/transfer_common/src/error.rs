use thiserror::Error;

use crate::booking::ValidationError;
use crate::services::CalendarServiceError;

/// Errors surfaced by the booking endpoint.
///
/// Every variant maps to a status code and is rendered as the uniform
/// `{ "success": false, "error": ... }` envelope (see `http.rs`).
#[derive(Error, Debug)]
pub enum BookingError {
    /// Missing or malformed fields. User-correctable.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    NotFound,

    /// Service account credentials absent or malformed. Operator-fixable.
    #[error("Service account configuration error: {0}")]
    AuthConfiguration(String),

    /// The calendar API rejected or failed the call.
    #[error("{0}")]
    Upstream(String),

    #[error("Calendar request timed out after {0}s")]
    Timeout(u64),
}

impl BookingError {
    /// The message placed in the response envelope.
    ///
    /// Configuration details stay in the server log.
    pub fn public_message(&self) -> String {
        match self {
            BookingError::Validation(err) => err.summary().to_string(),
            BookingError::AuthConfiguration(_) => "Failed to create booking".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<CalendarServiceError> for BookingError {
    fn from(err: CalendarServiceError) -> Self {
        match err {
            CalendarServiceError::AuthConfiguration(msg) => BookingError::AuthConfiguration(msg),
            CalendarServiceError::Upstream(msg) => BookingError::Upstream(msg),
        }
    }
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for BookingError {
    fn status_code(&self) -> u16 {
        match self {
            BookingError::Validation(_) => 400,
            BookingError::MethodNotAllowed => 405,
            BookingError::NotFound => 404,
            BookingError::AuthConfiguration(_) => 500,
            BookingError::Upstream(_) => 500,
            BookingError::Timeout(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            BookingError::Validation(ValidationError::default()).status_code(),
            400
        );
        assert_eq!(BookingError::MethodNotAllowed.status_code(), 405);
        assert_eq!(BookingError::NotFound.status_code(), 404);
        assert_eq!(BookingError::Upstream("quota".into()).status_code(), 500);
        assert_eq!(BookingError::Timeout(30).status_code(), 500);
    }

    #[test]
    fn test_auth_configuration_detail_is_not_public() {
        let err = BookingError::AuthConfiguration("private key is malformed".into());
        assert_eq!(err.public_message(), "Failed to create booking");
        assert!(err.to_string().contains("private key is malformed"));
    }

    #[test]
    fn test_upstream_message_is_passed_through() {
        let err: BookingError =
            CalendarServiceError::Upstream("Rate Limit Exceeded".into()).into();
        assert_eq!(err.public_message(), "Rate Limit Exceeded");
    }
}
