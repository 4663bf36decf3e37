//! Custom serde helpers for backend wire formats.

/// Deserializes an optional purchase timestamp.
///
/// The trading backend serializes `purchaseDate` as a zone-less ISO local
/// date-time (`2024-03-01T10:15:30.123`). RFC 3339 strings are accepted too
/// and normalized to UTC. Anything unparseable becomes `None`.
pub mod lenient_datetime {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Converts Unix seconds into `DateTime<Utc>`, `None` when out of range.
pub fn from_unix_seconds(secs: i64) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::<chrono::Utc>::from_timestamp(secs, 0)
}
