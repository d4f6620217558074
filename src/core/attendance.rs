//! Attendance recorder: one check-in and one check-out per calendar day,
//! plus the lateness rule.

use crate::core::policy::Policy;
use crate::models::event::{any_on, earliest_on};
use crate::models::{ConfigRecord, Event, EventType, UserRecord};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::fmt;
use tracing::debug;

/// Why a check-in/out was refused. These are expected outcomes, not errors:
/// nothing is appended when one is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckRejection {
    AlreadyRecorded { kind: EventType, at: NaiveDateTime },
    NoCheckInToday,
}

impl fmt::Display for CheckRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckRejection::AlreadyRecorded { kind, at } => write!(
                f,
                "You already recorded your {} today at {}",
                kind.label(),
                at.format("%H:%M")
            ),
            CheckRejection::NoCheckInToday => {
                f.write_str("You have not checked in today, so you cannot check out")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Recorded(NaiveDateTime),
    Rejected(CheckRejection),
}

impl CheckOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, CheckOutcome::Recorded(_))
    }
}

fn already_recorded(events: &[Event], kind: EventType, day: NaiveDate) -> Option<CheckRejection> {
    earliest_on(events, day).map(|at| CheckRejection::AlreadyRecorded { kind, at })
}

/// Append a check-in stamped `now` unless one already exists today.
pub fn record_check_in(user: &mut UserRecord, now: NaiveDateTime) -> CheckOutcome {
    let today = now.date();
    if let Some(rejection) = already_recorded(&user.check_ins, EventType::In, today) {
        debug!(%today, "duplicate check-in refused");
        return CheckOutcome::Rejected(rejection);
    }
    user.check_ins.push(Event::new(now));
    CheckOutcome::Recorded(now)
}

/// Append a check-out stamped `now`. Requires a check-in today and no
/// earlier check-out today.
pub fn record_check_out(user: &mut UserRecord, now: NaiveDateTime) -> CheckOutcome {
    let today = now.date();
    if let Some(rejection) = already_recorded(&user.check_outs, EventType::Out, today) {
        debug!(%today, "duplicate check-out refused");
        return CheckOutcome::Rejected(rejection);
    }
    if !any_on(&user.check_ins, today) {
        debug!(%today, "check-out without check-in refused");
        return CheckOutcome::Rejected(CheckRejection::NoCheckInToday);
    }
    user.check_outs.push(Event::new(now));
    CheckOutcome::Recorded(now)
}

pub fn is_unlimited(config: &ConfigRecord, day: NaiveDate) -> bool {
    config.unlimited_dates.contains(&day)
}

/// Late means strictly after the weekday's cutoff. Nobody is late on an
/// unlimited day.
pub fn is_late(
    config: &ConfigRecord,
    policy: &Policy,
    today: NaiveDate,
    when: NaiveDateTime,
) -> bool {
    if is_unlimited(config, today) {
        return false;
    }
    let cutoff = policy.cutoff_for(when.weekday(), config);
    when.time() > cutoff
}

pub fn first_check_in_for_day(user: &UserRecord, day: NaiveDate) -> Option<NaiveDateTime> {
    earliest_on(&user.check_ins, day)
}

pub fn worked_minutes(first_in: NaiveDateTime, out: NaiveDateTime) -> i64 {
    (out - first_in).num_minutes().max(0)
}

/// Minutes worked past the overtime threshold of `out`'s weekday.
pub fn overtime_minutes(policy: &Policy, out: NaiveDateTime) -> i64 {
    let start = out.date().and_time(policy.overtime_start_for(out.weekday()));
    if out > start {
        (out - start).num_minutes()
    } else {
        0
    }
}
