//! Lenient timestamp coercion for nested document fields.
//!
//! Documents written by older clients carry dates in several shapes:
//! RFC 3339 strings, epoch milliseconds, or `{seconds, nanoseconds}`
//! objects. Everything is coerced into `DateTime<Utc>`; values that
//! cannot be interpreted normalize to `None` instead of failing the
//! whole record.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Millis(i64),
    Parts {
        seconds: i64,
        #[serde(default)]
        nanoseconds: u32,
    },
}

impl RawTimestamp {
    fn coerce(self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::Text(text) => parse_text(&text),
            RawTimestamp::Millis(ms) => Utc.timestamp_millis_opt(ms).single(),
            RawTimestamp::Parts {
                seconds,
                nanoseconds,
            } => Utc.timestamp_opt(seconds, nanoseconds).single(),
        }
    }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    // Plain calendar dates from date pickers (`2024-03-01`).
    match chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()),
        Err(_) => {
            tracing::warn!(value = trimmed, "unparseable timestamp dropped");
            None
        }
    }
}

/// Coerce a loosely-typed JSON value into a UTC timestamp.
pub fn coerce_value(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    RawTimestamp::deserialize(value)
        .ok()
        .and_then(RawTimestamp::coerce)
}

/// `#[serde(with = "...")]` adapter for `Option<DateTime<Utc>>` fields.
pub mod lenient_option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw.as_ref().and_then(coerce_value))
    }
}
