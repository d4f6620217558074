//! Rewards engine: early-bird ranking and bonus, team bonus, overtime bank.

use crate::core::credits::points_value;
use crate::models::{Ledger, UserRecord};
use crate::models::event::earliest_on;
use crate::utils::group_thousands;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Minutes that make one overtime point.
pub const MINUTES_PER_POINT: i64 = 60;

/// Active users with a check-in dated `today`, as `(user_id, earliest)`,
/// earliest first. Ties keep user-id order.
pub fn today_earliest_per_user(
    ledger: &Ledger,
    today: NaiveDate,
) -> Vec<(String, NaiveDateTime)> {
    let mut rows: Vec<(String, NaiveDateTime)> = ledger
        .active_users()
        .filter_map(|(uid, u)| earliest_on(&u.check_ins, today).map(|dt| (uid.clone(), dt)))
        .collect();
    rows.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

/// Today's top-`k` as text: rank, name, time, points and their value.
pub fn build_early_birds_ladder(ledger: &Ledger, today: NaiveDate, k: usize) -> String {
    let order = today_earliest_per_user(ledger, today);
    if order.is_empty() {
        return "🐦 Early-birds Ladder (today)\n— nobody has checked in yet —".to_string();
    }

    let mut lines = vec!["🐦 Early-birds Ladder (today)".to_string()];
    for (i, (uid, dt)) in order.iter().take(k).enumerate() {
        let (name, points) = match ledger.user(uid) {
            Some(u) => (u.display(uid).to_string(), u.points),
            None => (uid.clone(), 0),
        };
        lines.push(format!(
            "{}. {} - {} ({} pts | {})",
            i + 1,
            name,
            dt.format("%H:%M"),
            points,
            group_thousands(points_value(points))
        ));
    }
    lines.join("\n")
}

/// One line of the points leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRow {
    /// 1-based.
    pub rank: usize,
    pub user_id: String,
    pub name: String,
    pub points: i64,
    pub value: i64,
}

/// Every user ranked by points, highest first. Ties keep user-id order.
pub fn points_leaderboard(ledger: &Ledger) -> Vec<ScoreRow> {
    let mut users: Vec<(&String, &UserRecord)> = ledger.users.iter().collect();
    users.sort_by(|a, b| b.1.points.cmp(&a.1.points).then_with(|| a.0.cmp(b.0)));
    users
        .into_iter()
        .enumerate()
        .map(|(i, (uid, u))| ScoreRow {
            rank: i + 1,
            user_id: uid.clone(),
            name: u.display(uid).to_string(),
            points: u.points,
            value: points_value(u.points),
        })
        .collect()
}

/// Credit the early-bird point if `user_id` is active, among today's top-`k`
/// and not yet awarded today. Returns true iff the point was credited.
pub fn handle_early_bird_logic(
    ledger: &mut Ledger,
    user_id: &str,
    today: NaiveDate,
    k: usize,
) -> bool {
    if !ledger.user(user_id).is_some_and(|u| u.active) {
        return false;
    }

    let in_top = today_earliest_per_user(ledger, today)
        .iter()
        .take(k)
        .any(|(uid, _)| uid == user_id);
    if !in_top {
        return false;
    }

    let Some(user) = ledger.user_mut(user_id) else {
        return false;
    };
    if !user.top_awarded_dates.insert(today) {
        debug!(user_id, %today, "early-bird point already awarded");
        return false;
    }
    user.points += 1;
    info!(user_id, %today, points = user.points, "early-bird point awarded");
    true
}

/// When every active user checked in today strictly before `deadline`,
/// credit one point to each of them, once per day for the whole team.
/// Returns the awarded ids (empty when the condition fails or the bonus was
/// already granted today).
pub fn handle_team_checkin_bonus(
    ledger: &mut Ledger,
    today: NaiveDate,
    deadline: NaiveTime,
) -> BTreeSet<String> {
    let active: Vec<(&String, &UserRecord)> = ledger.active_users().collect();
    if active.is_empty() {
        return BTreeSet::new();
    }

    if active.iter().any(|(_, u)| u.team_awarded_dates.contains(&today)) {
        return BTreeSet::new();
    }

    let all_on_time = active.iter().all(|(_, u)| {
        earliest_on(&u.check_ins, today).is_some_and(|dt| dt.time() < deadline)
    });
    if !all_on_time {
        return BTreeSet::new();
    }

    let awarded: BTreeSet<String> = active.iter().map(|(uid, _)| (*uid).clone()).collect();
    for uid in &awarded {
        if let Some(u) = ledger.user_mut(uid) {
            u.points += 1;
            u.team_awarded_dates.insert(today);
        }
    }
    info!(%today, members = awarded.len(), "team check-in bonus awarded");
    awarded
}

/// Bank `minutes` of overtime and convert whole hours into points.
/// Returns `(points_added, remaining_minutes)`.
pub fn accrue_overtime_points(user: &mut UserRecord, minutes: i64) -> (i64, i64) {
    if minutes <= 0 {
        return (0, user.overtime_minutes_bank);
    }

    let bank = user.overtime_minutes_bank + minutes;
    let points_added = bank / MINUTES_PER_POINT;
    let remainder = bank % MINUTES_PER_POINT;
    user.overtime_minutes_bank = remainder;
    user.points += points_added;
    (points_added, remainder)
}
