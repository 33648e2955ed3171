// --- File: crates/transfer_config/src/models.rs ---

use serde::Deserialize;
use std::fmt;

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16, // Loaded via TRANSFER__SERVER__PORT or PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// --- Google Calendar Config ---
// Credentials are optional at load time; a booking request without them
// fails with an auth configuration error instead of the whole server.
#[derive(Deserialize, Clone)]
pub struct GcalConfig {
    pub client_email: Option<String>, // GOOGLE_CLIENT_EMAIL
    pub private_key: Option<String>,  // GOOGLE_PRIVATE_KEY, newline-escaped
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String, // GOOGLE_CALENDAR_ID
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl Default for GcalConfig {
    fn default() -> Self {
        Self {
            client_email: None,
            private_key: None,
            calendar_id: default_calendar_id(),
            token_uri: default_token_uri(),
        }
    }
}

impl fmt::Debug for GcalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcalConfig")
            .field("client_email", &self.client_email)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<redacted>"),
            )
            .field("calendar_id", &self.calendar_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

// --- Booking Endpoint Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    /// IANA zone used to interpret local booking times, e.g. "Europe/Lisbon".
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Upper bound for a single calendar insert call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

// --- CORS Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default = "default_allow_origin")]
    pub allow_origin: String,
    #[serde(default = "default_allow_headers")]
    pub allow_headers: Vec<String>,
    #[serde(default = "default_true")]
    pub allow_credentials: bool,
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: default_allow_origin(),
            allow_headers: default_allow_headers(),
            allow_credentials: true,
            max_age_secs: default_max_age_secs(),
        }
    }
}

// --- Client Form Config ---
// Used by the booking form, not by the server.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_messaging_host")]
    pub messaging_host: String,
    #[serde(default = "default_operator_contact")]
    pub operator_contact: String,
    #[serde(default = "default_open_delay_ms")]
    pub open_delay_ms: u64,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            messaging_host: default_messaging_host(),
            operator_contact: default_operator_contact(),
            open_delay_ms: default_open_delay_ms(),
            time_zone: default_time_zone(),
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gcal: GcalConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3333
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_time_zone() -> String {
    "Europe/Lisbon".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_allow_origin() -> String {
    "*".to_string()
}

fn default_allow_headers() -> Vec<String> {
    [
        "X-CSRF-Token",
        "X-Requested-With",
        "Accept",
        "Accept-Version",
        "Content-Length",
        "Content-MD5",
        "Content-Type",
        "Date",
        "X-Api-Version",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect()
}

fn default_true() -> bool {
    true
}

fn default_max_age_secs() -> u64 {
    86400
}

fn default_api_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_messaging_host() -> String {
    "wa.me".to_string()
}

fn default_operator_contact() -> String {
    "351914981306".to_string()
}

fn default_open_delay_ms() -> u64 {
    500
}
