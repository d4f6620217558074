use crate::utils::time::ledger_datetime;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single check-in or check-out, stored as `{"datetime": "YYYY-MM-DD HH:MM"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(with = "ledger_datetime")]
    pub datetime: NaiveDateTime,
}

impl Event {
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self { datetime }
    }

    pub fn date(&self) -> NaiveDate {
        self.datetime.date()
    }

    pub fn date_str(&self) -> String {
        self.datetime.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.datetime.format("%H:%M").to_string()
    }
}

/// Earliest event on `day`, if any.
pub fn earliest_on(events: &[Event], day: NaiveDate) -> Option<NaiveDateTime> {
    events
        .iter()
        .filter(|e| e.date() == day)
        .map(|e| e.datetime)
        .min()
}

pub fn any_on(events: &[Event], day: NaiveDate) -> bool {
    events.iter().any(|e| e.date() == day)
}
