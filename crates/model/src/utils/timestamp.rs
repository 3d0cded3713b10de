//! Timestamp parsing and display helpers.
//!
//! Messages carry a `DateTime<Utc>`. On the wire they are RFC 3339 strings
//! with millisecond precision, but older payloads also use naive date-times,
//! epoch milliseconds, or a bare display time such as `"10:30 AM"`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};

use crate::types::{ModelError, ModelResult};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

const TIME_ONLY_FORMATS: &[&str] = &[
    "%I:%M %p",
    "%I:%M%p",
    "%I:%M:%S %p",
    "%H:%M:%S",
    "%H:%M",
];

/// Parse a full timestamp in any of the accepted wire formats.
pub fn parse_timestamp(text: &str) -> ModelResult<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ModelError::invalid_timestamp(text, "timestamp is empty"));
    }

    if is_integer(trimmed) {
        let millis: i64 = trimmed
            .parse()
            .map_err(|_| ModelError::invalid_timestamp(text, "epoch millis out of range"))?;
        return from_millis(millis);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }

    Err(ModelError::invalid_timestamp(text, "unrecognised format"))
}

/// Parse a time-only display string (`"9:05 PM"`, `"14:30"`) on `date`, in UTC.
pub fn parse_time_on(text: &str, date: NaiveDate) -> ModelResult<DateTime<Utc>> {
    let trimmed = text.trim();
    for format in TIME_ONLY_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&date.and_time(time)));
        }
    }

    Err(ModelError::invalid_timestamp(text, "not a time of day"))
}

/// Convert epoch milliseconds into a UTC timestamp.
pub fn from_millis(millis: i64) -> ModelResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| ModelError::invalid_timestamp(millis.to_string(), "epoch millis out of range"))
}

/// Canonical wire representation.
pub fn to_wire(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `h:mm AM/PM` in the display offset.
pub fn format_time(ts: &DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format("%-I:%M %p").to_string()
}

/// Calendar date of `ts` as seen in the display offset.
pub fn local_date(ts: &DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    ts.with_timezone(&offset).date_naive()
}

fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Serde adapter: writes RFC 3339, reads any format [`parse_timestamp`] accepts.
pub mod serde_flexible {
    use std::fmt;

    use chrono::{DateTime, Utc};
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_wire(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FlexibleVisitor)
    }

    struct FlexibleVisitor;

    impl<'de> Visitor<'de> for FlexibleVisitor {
        type Value = DateTime<Utc>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an RFC 3339 string, a naive date-time, or epoch milliseconds")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            super::parse_timestamp(value).map_err(E::custom)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            super::from_millis(value).map_err(E::custom)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let millis = i64::try_from(value).map_err(|_| E::custom("epoch millis out of range"))?;
            self.visit_i64(millis)
        }
    }
}
