pub mod application;
pub mod team;

use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, Deserialize, Deserializer};
use thiserror::Error;
use uuid::Uuid;

pub use application::{Application, ApplicationStatus, ApplicationSubmission};
pub use team::{Team, TeamPayload};

/// `local@domain.tld` shape: no whitespace, exactly one `@`, a dot after it.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Record-level validation failures. Rendered as 400s by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid email format")]
    InvalidApplicantEmail,

    #[error("Team name is required")]
    MissingTeamName,

    #[error("At least one executive or project lead email is required")]
    NoRecipients,

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Status must be one of: {}", ApplicationStatus::allowed_values())]
    InvalidStatus,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Best-effort unique identifier: base-36 millisecond timestamp followed by a
/// random base-36 suffix. Collisions are not checked anywhere.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    let random = Uuid::new_v4().as_u128() & ((1u128 << 52) - 1);
    format!("{}{}", to_base36(millis), to_base36(random))
}

fn to_base36(mut n: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Offset-less layouts accepted for stored timestamps, read as UTC.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses an RFC 3339 timestamp, or a local ISO date-time without an offset.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// `deserialize_with` target for record timestamps. Pair with
/// `#[serde(default = "Utc::now")]` so a missing field does not reject the record.
pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
}

/// Collapses blank optional text to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
