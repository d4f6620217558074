//! Average check-in time per user over a trailing window.

use crate::errors::{AppError, AppResult};
use crate::models::Ledger;
use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime, Timelike, Weekday};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub days: i64,
    pub exclude_users: BTreeSet<String>,
    pub exclude_weekdays: HashSet<Weekday>,
    pub limit: Option<usize>,
}

impl ReportOptions {
    /// Last 30 days, skipping `short_day`.
    pub fn new(short_day: Weekday) -> Self {
        Self {
            days: 30,
            exclude_users: BTreeSet::new(),
            exclude_weekdays: HashSet::from([short_day]),
            limit: None,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.days <= 0 {
            return Err(AppError::InvalidOption(
                "days must be greater than zero".to_string(),
            ));
        }
        if self.limit == Some(0) {
            return Err(AppError::InvalidOption(
                "limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AverageCheckIn {
    pub username: String,
    /// Mean minute of day.
    pub average_minutes: f64,
    pub samples: usize,
}

impl AverageCheckIn {
    /// Mean rounded to the nearest minute.
    pub fn time(&self) -> NaiveTime {
        let total = (self.average_minutes.round() as u32) % (24 * 60);
        NaiveTime::from_hms_opt(total / 60, total % 60, 0).unwrap_or(NaiveTime::MIN)
    }
}

/// Users without a username are reported as `user_<id>`. Exclusions match
/// usernames exactly.
pub fn average_checkins(
    ledger: &Ledger,
    now: NaiveDateTime,
    options: &ReportOptions,
) -> AppResult<Vec<AverageCheckIn>> {
    options.validate()?;
    let threshold = now - Duration::days(options.days);

    let mut rows: Vec<AverageCheckIn> = ledger
        .users
        .iter()
        .filter_map(|(uid, user)| {
            let username = if user.username.is_empty() {
                format!("user_{uid}")
            } else {
                user.username.clone()
            };
            if options.exclude_users.contains(&username) {
                return None;
            }

            let minutes: Vec<u32> = user
                .check_ins
                .iter()
                .map(|e| e.datetime)
                .filter(|dt| *dt >= threshold)
                .filter(|dt| !options.exclude_weekdays.contains(&dt.weekday()))
                .map(|dt| dt.hour() * 60 + dt.minute())
                .collect();
            if minutes.is_empty() {
                return None;
            }

            let sum: u64 = minutes.iter().map(|m| u64::from(*m)).sum();
            Some(AverageCheckIn {
                username,
                average_minutes: sum as f64 / minutes.len() as f64,
                samples: minutes.len(),
            })
        })
        .collect();

    rows.sort_by(|a, b| a.average_minutes.total_cmp(&b.average_minutes));
    if let Some(limit) = options.limit {
        rows.truncate(limit);
    }
    Ok(rows)
}
