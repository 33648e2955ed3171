//! Client for the booking endpoint.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};
use transfer_common::booking::{BookingRequest, BookingResponse};
use transfer_config::ClientConfig;

/// Shown when the endpoint fails without saying why.
pub const FALLBACK_ERROR: &str = "Falha ao criar reserva";

const BOOKING_PATH: &str = "/api/create-booking";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The endpoint answered with an error envelope or a non-2xx status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The endpoint could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A 2xx answer that is not a booking envelope.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Submits bookings to the endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn create_booking(&self, booking: &BookingRequest) -> Result<BookingResponse, ApiError>;
}

/// [`BookingApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBookingApi {
    client: Client,
    endpoint: String,
}

impl HttpBookingApi {
    pub fn new(api_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}{}", api_url.trim_end_matches('/'), BOOKING_PATH),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.api_url)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn create_booking(&self, booking: &BookingRequest) -> Result<BookingResponse, ApiError> {
        debug!("POST {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(booking)
            .send()
            .await
            .map_err(|e| {
                warn!("Booking endpoint unreachable: {}", e);
                ApiError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response.json::<BookingResponse>().await;

        match body {
            Ok(body) if status.is_success() && body.success => Ok(body),
            Ok(body) => Err(ApiError::Rejected {
                status: status.as_u16(),
                message: body
                    .error
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| FALLBACK_ERROR.to_string()),
            }),
            Err(_) if !status.is_success() => Err(ApiError::Rejected {
                status: status.as_u16(),
                message: FALLBACK_ERROR.to_string(),
            }),
            Err(e) => Err(ApiError::InvalidResponse(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_is_joined_once() {
        assert_eq!(
            HttpBookingApi::new("http://localhost:3333/").endpoint(),
            "http://localhost:3333/api/create-booking"
        );
        assert_eq!(
            HttpBookingApi::from_config(&ClientConfig::default()).endpoint(),
            "http://localhost:3333/api/create-booking"
        );
    }

    #[test]
    fn test_rejected_displays_message_only() {
        let err = ApiError::Rejected {
            status: 500,
            message: "Rate Limit Exceeded".into(),
        };
        assert_eq!(err.to_string(), "Rate Limit Exceeded");
    }
}
