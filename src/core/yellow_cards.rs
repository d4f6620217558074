use crate::core::attendance::is_late;
use crate::core::policy::Policy;
use crate::errors::{AppError, AppResult};
use crate::models::{ConfigRecord, UserRecord, YellowCard};
use crate::utils::time::format_ledger_datetime;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

/// Points deducted by an automatic lateness card.
pub const YELLOW_CARD_PENALTY: i64 = 2;

/// Issue a lateness card and deduct `YELLOW_CARD_PENALTY` if `when` is late
/// and the user has no card dated `today` yet. Returns true iff a card was
/// issued. Must run after the check-in is recorded and before rewards.
pub fn maybe_add_yellow(
    config: &ConfigRecord,
    policy: &Policy,
    user: &mut UserRecord,
    when: NaiveDateTime,
    today: NaiveDate,
) -> bool {
    if !is_late(config, policy, today, when) {
        return false;
    }

    if user.yellow_cards.iter().any(|c| c.is_on(today)) {
        return false;
    }

    let note = format!("Late check-in at {}", format_ledger_datetime(&when));
    user.yellow_cards.push(YellowCard::late(today, note));
    user.points -= YELLOW_CARD_PENALTY;
    info!(%today, points = user.points, "late check-in, yellow card issued");
    true
}

/// Record an administrator-issued card. No points are deducted.
pub fn give_manual_yellow(user: &mut UserRecord, reason: &str, now: NaiveDateTime) -> YellowCard {
    let note = format!(
        "Manual yellow card at {}: {}",
        format_ledger_datetime(&now),
        reason.trim()
    );
    let card = YellowCard::manual(now.date(), note);
    user.yellow_cards.push(card.clone());
    card
}

/// Remove a card by its 1-based number. Points are not refunded.
pub fn remove_yellow(user: &mut UserRecord, number: usize) -> AppResult<YellowCard> {
    let len = user.yellow_cards.len();
    if number == 0 || number > len {
        return Err(AppError::InvalidCardNumber { number, len });
    }
    Ok(user.yellow_cards.remove(number - 1))
}
