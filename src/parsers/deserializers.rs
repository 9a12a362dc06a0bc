use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Epoch values below this are read as seconds, above it as milliseconds (~year 5138 in seconds).
const SECONDS_MILLIS_CUTOFF: f64 = 1e11;

/// Treats an explicit `null` the same as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Converts fractional epoch seconds to a UTC timestamp at millisecond precision.
pub fn epoch_seconds_to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((seconds * 1000.0) as i64)
}

/// Lenient timestamp reader for flat message dialects.
///
/// Accepts epoch numbers (seconds or milliseconds) and RFC3339 strings. Anything else,
/// including unparseable strings, yields `None` rather than failing the message.
pub fn deserialize_lenient_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(timestamp_from_value))
}

fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let raw = n.as_f64()?;
            if raw.abs() < SECONDS_MILLIS_CUTOFF {
                epoch_seconds_to_datetime(raw)
            } else {
                DateTime::from_timestamp_millis(raw as i64)
            }
        }
        Value::String(s) => s.parse::<DateTime<Utc>>().ok(),
        _ => None,
    }
}
