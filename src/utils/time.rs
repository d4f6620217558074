//! Time utilities: parsing HH:MM, ledger timestamps, UTC offsets, formatting minutes.

use crate::errors::{AppError, AppResult};
use chrono::{FixedOffset, NaiveDateTime, NaiveTime, Timelike};

/// Timestamp layout used by every event stored in the ledger.
pub const LEDGER_DATETIME_FMT: &str = "%Y-%m-%d %H:%M";

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// Parse an `HH:MM` cutoff, reporting the offending input on failure.
pub fn parse_hhmm(t: &str) -> AppResult<NaiveTime> {
    parse_time(t).ok_or_else(|| AppError::InvalidTime(t.to_string()))
}

pub fn parse_ledger_datetime(s: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), LEDGER_DATETIME_FMT)
        .map_err(|_| AppError::InvalidDate(s.to_string()))
}

pub fn format_ledger_datetime(dt: &NaiveDateTime) -> String {
    dt.format(LEDGER_DATETIME_FMT).to_string()
}

/// Drop seconds and sub-seconds: ledger events have minute precision.
pub fn truncate_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

/// Parse `+HH:MM` / `-HH:MM` (or `Z`) into a fixed offset.
pub fn parse_utc_offset(s: &str) -> AppResult<FixedOffset> {
    let raw = s.trim();
    if raw.eq_ignore_ascii_case("z") || raw == "+00:00" || raw == "00:00" {
        return FixedOffset::east_opt(0).ok_or_else(|| AppError::InvalidOffset(s.to_string()));
    }

    let (sign, rest) = match raw.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(AppError::InvalidOffset(s.to_string())),
    };

    let (h, m) = rest
        .split_once(':')
        .ok_or_else(|| AppError::InvalidOffset(s.to_string()))?;
    let hours: i32 = h.parse().map_err(|_| AppError::InvalidOffset(s.to_string()))?;
    let minutes: i32 = m.parse().map_err(|_| AppError::InvalidOffset(s.to_string()))?;
    if !(0..60).contains(&minutes) {
        return Err(AppError::InvalidOffset(s.to_string()));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| AppError::InvalidOffset(s.to_string()))
}

/// Serde adapter for `YYYY-MM-DD HH:MM` timestamps.
pub mod ledger_datetime {
    use super::LEDGER_DATETIME_FMT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.format(LEDGER_DATETIME_FMT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(raw.trim(), LEDGER_DATETIME_FMT).map_err(de::Error::custom)
    }
}

/// Serde adapter for an optional `HH:MM` value (`null` allowed).
pub mod optional_hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(t: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match t {
            Some(t) => s.serialize_str(&t.format("%H:%M").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => NaiveTime::parse_from_str(s.trim(), "%H:%M")
                .map(Some)
                .map_err(de::Error::custom),
        }
    }
}
