//! Booking schema shared by the booking form and the booking endpoint.
//!
//! Both sides validate through [`FormSchema::validate`], so a payload the
//! form accepts is accepted by the endpoint with the same rules. The endpoint
//! never relies on the form having validated anything.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Wire key of the optional client-generated idempotency identifier.
pub const REQUEST_ID_KEY: &str = "requestId";

/// A field collected by the booking form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BookingField {
    Name,
    Phone,
    MeetingLocation,
    Destination,
    DateTime,
    NumberOfBags,
    PassengerCount,
}

impl BookingField {
    pub const ALL: [BookingField; 7] = [
        BookingField::Name,
        BookingField::Phone,
        BookingField::MeetingLocation,
        BookingField::Destination,
        BookingField::DateTime,
        BookingField::NumberOfBags,
        BookingField::PassengerCount,
    ];

    /// The JSON key used on the wire.
    pub fn key(self) -> &'static str {
        match self {
            BookingField::Name => "name",
            BookingField::Phone => "phone",
            BookingField::MeetingLocation => "meetingLocation",
            BookingField::Destination => "destination",
            BookingField::DateTime => "dateTime",
            BookingField::NumberOfBags => "numberOfBags",
            BookingField::PassengerCount => "passageiros",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.key() == key)
    }
}

impl fmt::Display for BookingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// How a field value is interpreted once it passes the length check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Non-negative integer, string-encoded.
    Count,
    /// ISO-8601 date-time, see [`BookingTime::parse`].
    DateTime,
}

/// One entry of a declarative form schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: BookingField,
    pub label: String,
    pub required: bool,
    pub min_len: usize,
    pub kind: FieldKind,
    /// Shown next to the input when the rule fails.
    pub message: String,
}

impl FieldRule {
    pub fn new(field: BookingField, label: &str, kind: FieldKind) -> Self {
        Self {
            field,
            label: label.to_string(),
            required: false,
            min_len: 0,
            kind,
            message: format!("{} inválido", label),
        }
    }

    pub fn required(mut self, min_len: usize) -> Self {
        self.required = true;
        self.min_len = min_len.max(1);
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }

    /// Checks a single value against this rule.
    fn check(&self, value: Option<&str>) -> FieldCheck {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let Some(value) = value else {
            return if self.required {
                FieldCheck::Missing
            } else {
                FieldCheck::Absent
            };
        };
        if value.chars().count() < self.min_len {
            return FieldCheck::Missing;
        }
        let well_formed = match self.kind {
            FieldKind::Text => true,
            FieldKind::Count => value.parse::<u32>().is_ok(),
            FieldKind::DateTime => BookingTime::parse(value).is_some(),
        };
        if well_formed {
            FieldCheck::Ok
        } else {
            FieldCheck::Invalid
        }
    }
}

enum FieldCheck {
    Ok,
    Absent,
    Missing,
    Invalid,
}

/// Declarative list of form fields and their validation rules.
///
/// Adding or dropping a field (e.g. passenger count) is a change to this
/// list, not a new form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    rules: Vec<FieldRule>,
}

impl FormSchema {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// The transfer booking schema: five required fields plus optional
    /// luggage and passenger counts.
    pub fn transfer() -> Self {
        Self::new(vec![
            FieldRule::new(BookingField::Name, "Nome Completo", FieldKind::Text)
                .required(1)
                .with_message("Nome é obrigatório"),
            FieldRule::new(BookingField::Phone, "Telefone de Contacto", FieldKind::Text)
                .required(9)
                .with_message("Telefone de contacto é obrigatório"),
            FieldRule::new(BookingField::MeetingLocation, "Local de Encontro", FieldKind::Text)
                .required(3)
                .with_message("Local de encontro é obrigatório"),
            FieldRule::new(BookingField::Destination, "Destino", FieldKind::Text)
                .required(3)
                .with_message("Destino é obrigatório"),
            FieldRule::new(BookingField::DateTime, "Data e Horário", FieldKind::DateTime)
                .required(1)
                .with_message("Data e horário são obrigatórios"),
            FieldRule::new(
                BookingField::PassengerCount,
                "Quantidade de Passageiros",
                FieldKind::Count,
            )
            .with_message("Número de passageiros inválido"),
            FieldRule::new(BookingField::NumberOfBags, "Quantidade de Malas", FieldKind::Count)
                .with_message("Quantidade de malas inválida"),
        ])
    }

    /// Replaces the rule for `rule.field`, or appends it.
    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        match self.rules.iter_mut().find(|r| r.field == rule.field) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
        self
    }

    pub fn without(mut self, field: BookingField) -> Self {
        self.rules.retain(|r| r.field != field);
        self
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn rule(&self, field: BookingField) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    /// Validates a raw payload and produces the typed request.
    ///
    /// Fields outside the schema are ignored. A required field the schema
    /// does not list can never be satisfied, so the five core fields must
    /// stay in any schema used with the endpoint.
    pub fn validate(&self, raw: &RawBooking) -> Result<BookingRequest, ValidationError> {
        let mut error = ValidationError::default();

        for rule in &self.rules {
            match rule.check(raw.get(rule.field)) {
                FieldCheck::Ok | FieldCheck::Absent => {}
                FieldCheck::Missing => error.missing_fields.push(rule.field.key()),
                FieldCheck::Invalid => error.invalid_fields.push(rule.field.key()),
            }
        }
        for field in [
            BookingField::Name,
            BookingField::Phone,
            BookingField::MeetingLocation,
            BookingField::Destination,
            BookingField::DateTime,
        ] {
            if self.rule(field).is_none() {
                error.missing_fields.push(field.key());
            }
        }

        let request_id = match raw.request_id() {
            Some(id) => match Uuid::parse_str(id.trim()) {
                Ok(id) => Some(id),
                Err(_) => {
                    error.invalid_fields.push(REQUEST_ID_KEY);
                    None
                }
            },
            None => None,
        };

        if !error.is_empty() {
            return Err(error);
        }

        let text = |field: BookingField| {
            raw.get(field)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        let count = |field: BookingField| {
            self.rule(field)
                .and(raw.get(field))
                .and_then(|v| v.trim().parse::<u32>().ok())
        };

        Ok(BookingRequest {
            name: text(BookingField::Name),
            phone: text(BookingField::Phone),
            meeting_location: text(BookingField::MeetingLocation),
            destination: text(BookingField::Destination),
            date_time: text(BookingField::DateTime),
            number_of_bags: count(BookingField::NumberOfBags),
            passenger_count: count(BookingField::PassengerCount),
            request_id,
        })
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::transfer()
    }
}

/// Loosely-typed payload: field key to textual value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBooking {
    values: BTreeMap<BookingField, String>,
    request_id: Option<String>,
}

impl RawBooking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON body. Anything that is not an object yields an empty payload.
    /// Numbers are accepted where strings are expected; `null` counts as absent.
    pub fn from_json(body: &Value) -> Self {
        let mut raw = Self::new();
        let Some(object) = body.as_object() else {
            return raw;
        };
        for field in BookingField::ALL {
            let value = object.get(field.key()).or_else(|| match field {
                BookingField::PassengerCount => object.get("passengerCount"),
                _ => None,
            });
            if let Some(text) = value.and_then(json_text) {
                raw.values.insert(field, text);
            }
        }
        raw.request_id = object.get(REQUEST_ID_KEY).and_then(json_text);
        raw
    }

    pub fn with(mut self, field: BookingField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: BookingField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: BookingField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.request_id = None;
    }
}

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A payload that failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    /// Wire keys of fields that are absent, empty or shorter than their minimum.
    pub missing_fields: Vec<&'static str>,
    /// Wire keys of fields that are present but cannot be interpreted.
    pub invalid_fields: Vec<&'static str>,
}

impl ValidationError {
    pub fn invalid(field: BookingField) -> Self {
        Self {
            missing_fields: Vec::new(),
            invalid_fields: vec![field.key()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.missing_fields.is_empty() && self.invalid_fields.is_empty()
    }

    /// Short summary suitable for the response envelope.
    pub fn summary(&self) -> &'static str {
        if self.missing_fields.is_empty() {
            "Invalid field values"
        } else {
            "Missing required fields"
        }
    }

    /// Every offending wire key, missing first.
    pub fn fields(&self) -> Vec<&'static str> {
        self.missing_fields
            .iter()
            .chain(self.invalid_fields.iter())
            .copied()
            .collect()
    }

    /// Per-field messages taken from the schema, for display next to inputs.
    pub fn messages(&self, schema: &FormSchema) -> Vec<(BookingField, String)> {
        self.fields()
            .into_iter()
            .filter_map(BookingField::from_key)
            .map(|field| {
                let message = schema
                    .rule(field)
                    .map(|r| r.message.clone())
                    .unwrap_or_else(|| format!("{} é obrigatório", field.key()));
                (field, message)
            })
            .collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.summary(), self.fields().join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// A booking that passed validation. Serializes to the endpoint's request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: String,
    pub phone: String,
    pub meeting_location: String,
    pub destination: String,
    pub date_time: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_count"
    )]
    pub number_of_bags: Option<u32>,
    #[serde(
        rename = "passageiros",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_count"
    )]
    pub passenger_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

impl BookingRequest {
    /// Resolves `date_time` to an instant in `tz`.
    pub fn scheduled_at(&self, tz: Tz) -> Result<DateTime<Tz>, ValidationError> {
        BookingTime::parse(&self.date_time)
            .and_then(|time| time.resolve(tz))
            .ok_or_else(|| ValidationError::invalid(BookingField::DateTime))
    }
}

// Counts travel as strings, matching what an HTML number input submits.
fn serialize_count<S: Serializer>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(count) => serializer.serialize_str(&count.to_string()),
        None => serializer.serialize_none(),
    }
}

/// A parsed booking date-time, before a zone is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingTime {
    /// Carries its own offset (RFC 3339).
    Fixed(DateTime<FixedOffset>),
    /// Wall-clock time, as produced by a `datetime-local` input.
    Local(NaiveDateTime),
}

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

impl BookingTime {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(fixed) = DateTime::parse_from_rfc3339(raw) {
            return Some(BookingTime::Fixed(fixed));
        }
        LOCAL_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(BookingTime::Local)
    }

    /// Places the time in `tz`. A wall-clock time skipped by a DST change
    /// has no instant and yields `None`; a repeated one takes the earlier.
    pub fn resolve(self, tz: Tz) -> Option<DateTime<Tz>> {
        match self {
            BookingTime::Fixed(fixed) => Some(fixed.with_timezone(&tz)),
            BookingTime::Local(naive) => tz.from_local_datetime(&naive).earliest(),
        }
    }
}

/// Response envelope of the booking endpoint, success and failure alike.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_fields: Option<Vec<String>>,
}

impl BookingResponse {
    pub fn created(message: &str, event_id: String, event_link: Option<String>) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            event_id: Some(event_id),
            event_link,
            error: None,
            missing_fields: None,
            invalid_fields: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            event_id: None,
            event_link: None,
            error: Some(error.into()),
            missing_fields: None,
            invalid_fields: None,
        }
    }
}

/// Body of `GET /api/health`.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}
