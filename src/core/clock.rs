//! Time source for the ledger. Everything downstream works on zone-local
//! wall time with minute precision.

use crate::utils::time::truncate_to_minute;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Utc};

pub trait Clock: Send + Sync {
    /// Current local wall time, seconds dropped.
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock at a fixed UTC offset (the operating time zone has no DST).
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        truncate_to_minute(Utc::now().with_timezone(&self.offset).naive_local())
    }
}

/// A clock frozen at one instant; used by `--now` and by tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        truncate_to_minute(self.0)
    }
}
