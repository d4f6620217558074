//! Ledger operations. Each one is a single store transaction (lock, load,
//! run the services in order, persist, unlock); notifications go out only
//! after the transaction has committed.

use crate::core::attendance::{
    self, CheckOutcome, CheckRejection, first_check_in_for_day, overtime_minutes, worked_minutes,
};
use crate::core::clock::Clock;
use crate::core::credits::{self, Refund, TransferReceipt};
use crate::core::notify::{Notifier, notify_best_effort};
use crate::core::policy::Policy;
use crate::core::{rewards, yellow_cards};
use crate::errors::{AppError, AppResult};
use crate::models::{Ledger, UserRecord, WithdrawalRequest, YellowCard};
use crate::store::LedgerStore;
use crate::utils::group_thousands;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;
use tracing::info;

/// Collaborators every operation needs besides the store itself.
pub struct LedgerContext<'a, N: Notifier> {
    pub clock: &'a dyn Clock,
    pub policy: &'a Policy,
    pub notifier: &'a N,
}

impl<'a, N: Notifier> LedgerContext<'a, N> {
    pub fn new(clock: &'a dyn Clock, policy: &'a Policy, notifier: &'a N) -> Self {
        Self {
            clock,
            policy,
            notifier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInReport {
    pub user_id: String,
    pub display: String,
    pub at: NaiveDateTime,
    pub yellow_card: bool,
    pub early_bird: bool,
    pub team_awarded: BTreeSet<String>,
    pub points: i64,
    pub balance: i64,
    pub ladder: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInOutcome {
    CheckedIn(CheckInReport),
    Rejected(CheckRejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutReport {
    pub user_id: String,
    pub display: String,
    pub at: NaiveDateTime,
    pub worked_minutes: Option<i64>,
    pub overtime_minutes: i64,
    pub overtime_points: i64,
    pub overtime_remaining: i64,
    pub points: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutOutcome {
    CheckedOut(CheckOutReport),
    Rejected(CheckRejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceReport {
    pub points: i64,
    pub balance: i64,
    pub overtime_minutes_bank: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalReceipt {
    pub request: WithdrawalRequest,
    /// 1-based position in the user's request list.
    pub number: usize,
    pub points: i64,
    pub balance: i64,
}

fn active_user<'l>(
    ledger: &'l mut Ledger,
    user_id: &str,
    username: Option<&str>,
) -> AppResult<&'l mut UserRecord> {
    let user = ledger.get_user(user_id, username);
    if !user.active {
        return Err(AppError::InactiveUser(user_id.to_string()));
    }
    Ok(user)
}

fn existing_user<'l>(ledger: &'l mut Ledger, user_id: &str) -> AppResult<&'l mut UserRecord> {
    ledger
        .user_mut(user_id)
        .ok_or_else(|| AppError::UnknownUser(user_id.to_string()))
}

/// Check-in pipeline: record, yellow card, early bird, team bonus, ladder.
pub async fn check_in<N: Notifier>(
    store: &LedgerStore,
    ctx: &LedgerContext<'_, N>,
    user_id: &str,
    username: Option<&str>,
) -> AppResult<CheckInOutcome> {
    let now = ctx.clock.now();
    let today = now.date();
    let policy = ctx.policy;

    let outcome = store
        .transaction(|ledger| {
            let user = active_user(ledger, user_id, username)?;
            let at = match attendance::record_check_in(user, now) {
                CheckOutcome::Recorded(at) => at,
                CheckOutcome::Rejected(r) => return Ok(CheckInOutcome::Rejected(r)),
            };

            let config = ledger.config.clone();
            let user = ledger.get_user(user_id, None);
            let yellow_card = yellow_cards::maybe_add_yellow(&config, policy, user, at, today);

            let early_bird =
                rewards::handle_early_bird_logic(ledger, user_id, today, policy.early_bird_winners);
            let team_awarded = match policy.team_bonus_deadline {
                Some(deadline) => rewards::handle_team_checkin_bonus(ledger, today, deadline),
                None => BTreeSet::new(),
            };

            credits::refresh_balances(ledger);
            let ladder =
                rewards::build_early_birds_ladder(ledger, today, policy.early_bird_winners);

            let user = ledger.get_user(user_id, None);
            Ok(CheckInOutcome::CheckedIn(CheckInReport {
                user_id: user_id.to_string(),
                display: user.display(user_id).to_string(),
                at,
                yellow_card,
                early_bird,
                team_awarded,
                points: user.points,
                balance: user.balance,
                ladder,
            }))
        })
        .await?;

    if let CheckInOutcome::CheckedIn(report) = &outcome {
        info!(
            user_id,
            at = %report.at,
            yellow = report.yellow_card,
            early_bird = report.early_bird,
            "check-in recorded"
        );
        if !report.team_awarded.is_empty() {
            let text =
                "🎉 The whole team checked in before the deadline today; +1 point for everyone!";
            for uid in report.team_awarded.iter().filter(|uid| uid.as_str() != user_id) {
                notify_best_effort(ctx.notifier, uid, text).await;
            }
        }
    }
    Ok(outcome)
}

/// Check-out pipeline: record, worked time, overtime accrual.
pub async fn check_out<N: Notifier>(
    store: &LedgerStore,
    ctx: &LedgerContext<'_, N>,
    user_id: &str,
    username: Option<&str>,
) -> AppResult<CheckOutOutcome> {
    let now = ctx.clock.now();
    let policy = ctx.policy;

    let outcome = store
        .transaction(|ledger| {
            let user = active_user(ledger, user_id, username)?;
            let at = match attendance::record_check_out(user, now) {
                CheckOutcome::Recorded(at) => at,
                CheckOutcome::Rejected(r) => return Ok(CheckOutOutcome::Rejected(r)),
            };

            let mut report = CheckOutReport {
                user_id: user_id.to_string(),
                display: user.display(user_id).to_string(),
                at,
                worked_minutes: None,
                overtime_minutes: 0,
                overtime_points: 0,
                overtime_remaining: user.overtime_minutes_bank,
                points: user.points,
            };

            if let Some(first_in) = first_check_in_for_day(user, at.date()) {
                report.worked_minutes = Some(worked_minutes(first_in, at));
                let overtime = overtime_minutes(policy, at);
                if overtime > 0 {
                    let (points, remaining) = rewards::accrue_overtime_points(user, overtime);
                    report.overtime_minutes = overtime;
                    report.overtime_points = points;
                    report.overtime_remaining = remaining;
                }
            }

            credits::update_balance(user);
            report.points = user.points;
            Ok(CheckOutOutcome::CheckedOut(report))
        })
        .await?;

    if let CheckOutOutcome::CheckedOut(report) = &outcome {
        info!(user_id, at = %report.at, overtime = report.overtime_minutes, "check-out recorded");
    }
    Ok(outcome)
}

/// Today's early-bird ladder (read only).
pub async fn ladder<N: Notifier>(
    store: &LedgerStore,
    ctx: &LedgerContext<'_, N>,
) -> AppResult<String> {
    let today = ctx.clock.today();
    let k = ctx.policy.early_bird_winners;
    store
        .read(|ledger| Ok(rewards::build_early_birds_ladder(ledger, today, k)))
        .await
}

pub async fn balance(store: &LedgerStore, user_id: &str) -> AppResult<BalanceReport> {
    store
        .read(|ledger| {
            Ok(ledger
                .user(user_id)
                .map(|u| BalanceReport {
                    points: u.points,
                    balance: credits::points_value(u.points),
                    overtime_minutes_bank: u.overtime_minutes_bank,
                })
                .unwrap_or(BalanceReport {
                    points: 0,
                    balance: 0,
                    overtime_minutes_bank: 0,
                }))
        })
        .await
}

pub async fn request_withdrawal<N: Notifier>(
    store: &LedgerStore,
    ctx: &LedgerContext<'_, N>,
    user_id: &str,
    amount: i64,
) -> AppResult<WithdrawalReceipt> {
    let now = ctx.clock.now();
    store
        .transaction(|ledger| {
            let user = ledger.get_user(user_id, None);
            let request = credits::request_withdrawal(user, amount, now)?;
            Ok(WithdrawalReceipt {
                request,
                number: user.withdrawals.len(),
                points: user.points,
                balance: user.balance,
            })
        })
        .await
}

pub async fn approve_withdrawal<N: Notifier>(
    store: &LedgerStore,
    ctx: &LedgerContext<'_, N>,
    user_id: &str,
    number: usize,
) -> AppResult<WithdrawalRequest> {
    let (request, points) = store
        .transaction(|ledger| {
            let user = existing_user(ledger, user_id)?;
            let request = credits::approve_withdrawal(user, number)?;
            credits::update_balance(user);
            Ok((request, user.points))
        })
        .await?;

    let text = format!(
        "✅ Your withdrawal for {} was approved.\nCurrent points: {} (≈ {} value)",
        group_thousands(request.amount),
        points,
        group_thousands(credits::points_value(points))
    );
    notify_best_effort(ctx.notifier, user_id, &text).await;
    Ok(request)
}

pub async fn reject_withdrawal<N: Notifier>(
    store: &LedgerStore,
    ctx: &LedgerContext<'_, N>,
    user_id: &str,
    number: usize,
) -> AppResult<Refund> {
    let refund = store
        .transaction(|ledger| {
            let user = existing_user(ledger, user_id)?;
            credits::reject_withdrawal(user, number)
        })
        .await?;

    let mut text = format!(
        "❌ Withdrawal {} rejected.",
        group_thousands(refund.request.amount)
    );
    if refund.points_refunded > 0 {
        text.push_str(&format!(
            " {} points returned to your balance.",
            refund.points_refunded
        ));
    }
    notify_best_effort(ctx.notifier, user_id, &text).await;
    Ok(refund)
}

/// Transfer `amount` points; `target` is a user id or a username.
pub async fn transfer<N: Notifier>(
    store: &LedgerStore,
    ctx: &LedgerContext<'_, N>,
    source: &str,
    target: &str,
    amount: i64,
) -> AppResult<TransferReceipt> {
    let receipt = store
        .transaction(|ledger| {
            let target_id = ledger
                .resolve_user_id(target)
                .ok_or_else(|| AppError::UnknownUser(target.to_string()))?;
            credits::transfer_points(ledger, source, &target_id, amount)
        })
        .await?;

    let text = format!("💰 You received {} points from {}.", receipt.amount, source);
    notify_best_effort(ctx.notifier, &receipt.target, &text).await;
    Ok(receipt)
}

pub async fn give_yellow<N: Notifier>(
    store: &LedgerStore,
    ctx: &LedgerContext<'_, N>,
    user_id: &str,
    reason: &str,
) -> AppResult<YellowCard> {
    let now = ctx.clock.now();
    let card = store
        .transaction(|ledger| {
            let user = existing_user(ledger, user_id)?;
            Ok(yellow_cards::give_manual_yellow(user, reason, now))
        })
        .await?;

    let text = format!("⚠️ A yellow card was issued: {}", reason.trim());
    notify_best_effort(ctx.notifier, user_id, &text).await;
    Ok(card)
}

pub async fn remove_yellow<N: Notifier>(
    store: &LedgerStore,
    ctx: &LedgerContext<'_, N>,
    user_id: &str,
    number: usize,
) -> AppResult<YellowCard> {
    let card = store
        .transaction(|ledger| {
            let user = existing_user(ledger, user_id)?;
            yellow_cards::remove_yellow(user, number)
        })
        .await?;

    let text = format!("ℹ️ A yellow card was removed:\n{}", card.note);
    notify_best_effort(ctx.notifier, user_id, &text).await;
    Ok(card)
}

/// Flip a user's `active` flag (creating the record if needed). Returns
/// whether anything changed.
pub async fn set_active(
    store: &LedgerStore,
    user_id: &str,
    active: bool,
    display_name: Option<&str>,
) -> AppResult<bool> {
    store
        .transaction(|ledger| {
            let user = ledger.get_user(user_id, None);
            let mut changed = user.active != active;
            user.active = active;
            if let Some(name) = display_name.map(str::trim).filter(|n| !n.is_empty())
                && user.display_name != name
            {
                user.display_name = name.to_string();
                changed = true;
            }
            Ok(changed)
        })
        .await
}

/// Mark `day` as unlimited (nobody is late). Returns false if it already was.
pub async fn unlimit_day(store: &LedgerStore, day: NaiveDate) -> AppResult<bool> {
    store
        .transaction(|ledger| Ok(ledger.config.unlimited_dates.insert(day)))
        .await
}

/// Set or clear the regular-day cutoff override.
pub async fn set_checkin_limit(store: &LedgerStore, limit: Option<NaiveTime>) -> AppResult<()> {
    store
        .transaction(|ledger| {
            ledger.config.checkin_limit = limit;
            Ok(())
        })
        .await
}
