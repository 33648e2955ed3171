// File: crates/transfer_gcal/src/auth.rs
use google_calendar3::{
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    yup_oauth2::{ServiceAccountAuthenticator, ServiceAccountKey},
    CalendarHub,
};
use serde_json::json;
use std::fmt;
use thiserror::Error;
use transfer_config::GcalConfig;

/// The only scope the service account token is requested for.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

// Type aliases for clarity
type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// Service account credentials are absent or unusable.
///
/// Never transient: retrying the same request cannot succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthConfigurationError {
    #[error("service account client email is not configured")]
    MissingClientEmail,
    #[error("service account client email is malformed")]
    MalformedClientEmail,
    #[error("service account private key is not configured")]
    MissingPrivateKey,
    #[error("service account private key is not a PEM encoded private key")]
    MalformedPrivateKey,
    #[error("failed to build service account authenticator: {0}")]
    Authenticator(String),
    #[error("failed to load TLS root certificates: {0}")]
    Tls(String),
}

/// Client email and private key of the calendar service account.
#[derive(Clone)]
pub struct ServiceAccountCredentials {
    client_email: String,
    private_key: String,
    token_uri: String,
}

impl fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountCredentials {
    /// Reads and checks the credentials from configuration.
    ///
    /// The private key may be newline-escaped (`\n` as two characters), as
    /// is usual when it is passed through an environment variable.
    pub fn from_config(config: &GcalConfig) -> Result<Self, AuthConfigurationError> {
        let client_email = config
            .client_email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .ok_or(AuthConfigurationError::MissingClientEmail)?;
        if !is_plausible_email(client_email) {
            return Err(AuthConfigurationError::MalformedClientEmail);
        }

        let private_key = config
            .private_key
            .as_deref()
            .map(unescape_private_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or(AuthConfigurationError::MissingPrivateKey)?;
        if !is_pem_private_key(&private_key) {
            return Err(AuthConfigurationError::MalformedPrivateKey);
        }

        Ok(Self {
            client_email: client_email.to_string(),
            private_key,
            token_uri: config.token_uri.clone(),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    fn service_account_key(&self) -> Result<ServiceAccountKey, AuthConfigurationError> {
        serde_json::from_value(json!({
            "type": "service_account",
            "client_email": self.client_email,
            "private_key": self.private_key,
            "token_uri": self.token_uri,
        }))
        .map_err(|e| AuthConfigurationError::Authenticator(e.to_string()))
    }
}

/// Turns literal `\n` sequences into newlines and drops wrapping quotes.
pub fn unescape_private_key(raw: &str) -> String {
    raw.trim().trim_matches('"').replace("\\n", "\n")
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn is_pem_private_key(key: &str) -> bool {
    let key = key.trim();
    key.starts_with("-----BEGIN")
        && key.ends_with("-----")
        && key.contains("PRIVATE KEY-----")
        && key.lines().count() >= 3
}

/// Builds a calendar client authorized as the service account.
///
/// No token is fetched here; the first API call requests one for
/// [`CALENDAR_SCOPE`].
pub async fn create_calendar_hub(
    credentials: &ServiceAccountCredentials,
) -> Result<HubType, AuthConfigurationError> {
    let sa_key = credentials.service_account_key()?;

    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .build()
        .await
        .map_err(|e| AuthConfigurationError::Authenticator(e.to_string()))?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|e| AuthConfigurationError::Tls(e.to_string()))?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    Ok(CalendarHub::new(client, auth))
}
