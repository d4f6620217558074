use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, Weekday};

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Resolve a weekday token: names and common abbreviations
/// (`thu`, `thur`, `thurs`, `thursday`) or a digit where Monday = 0.
pub fn parse_weekday(token: &str) -> AppResult<Weekday> {
    let normalized = token.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(AppError::InvalidWeekday(token.to_string()));
    }

    let day = match normalized.as_str() {
        "mon" | "monday" | "0" => Weekday::Mon,
        "tue" | "tues" | "tuesday" | "1" => Weekday::Tue,
        "wed" | "weds" | "wednesday" | "2" => Weekday::Wed,
        "thu" | "thur" | "thurs" | "thursday" | "3" => Weekday::Thu,
        "fri" | "friday" | "4" => Weekday::Fri,
        "sat" | "saturday" | "5" => Weekday::Sat,
        "sun" | "sunday" | "6" => Weekday::Sun,
        _ => return Err(AppError::InvalidWeekday(token.to_string())),
    };
    Ok(day)
}

/// Parse a comma separated weekday list, skipping empty items.
pub fn parse_weekday_list(value: &str) -> AppResult<Vec<Weekday>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(parse_weekday)
        .collect()
}

pub fn weekday_short_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
