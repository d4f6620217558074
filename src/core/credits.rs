//! Credits ledger: derived balance, withdrawals, and point transfers.
//!
//! Withdrawals hold points at request time. Approving a pending request only
//! changes its status; rejecting it refunds the held points.

use crate::errors::{AppError, AppResult};
use crate::models::{Ledger, UserRecord, WithdrawalRequest, WithdrawalStatus};
use chrono::NaiveDateTime;
use tracing::{info, warn};

/// Monetary value of one point.
pub const POINT_VALUE: i64 = 50_000;

/// Value of `points`, saturating at the `i64` bounds.
pub fn points_value(points: i64) -> i64 {
    points.saturating_mul(POINT_VALUE)
}

pub fn update_balance(user: &mut UserRecord) {
    if user.points.checked_mul(POINT_VALUE).is_none() {
        warn!(points = user.points, "balance out of range, saturating");
    }
    user.balance = points_value(user.points);
}

fn credit(points: i64, added: i64) -> AppResult<i64> {
    points
        .checked_add(added)
        .ok_or(AppError::PointsOverflow { points, added })
}

pub fn get_balance(user: &mut UserRecord) -> i64 {
    update_balance(user);
    user.balance
}

/// Recompute every derived balance in the ledger.
pub fn refresh_balances(ledger: &mut Ledger) {
    for user in ledger.users.values_mut() {
        update_balance(user);
    }
}

/// Validate `amount`, debit its point equivalent and append a pending request.
pub fn request_withdrawal(
    user: &mut UserRecord,
    amount: i64,
    now: NaiveDateTime,
) -> AppResult<WithdrawalRequest> {
    if amount <= 0 {
        return Err(AppError::NonPositiveAmount(amount));
    }
    if amount % POINT_VALUE != 0 {
        return Err(AppError::NotPointMultiple {
            amount,
            point_value: POINT_VALUE,
        });
    }

    let balance = get_balance(user);
    if amount > balance {
        return Err(AppError::InsufficientBalance {
            requested: amount,
            available: balance,
        });
    }

    let points_needed = amount / POINT_VALUE;
    if points_needed > user.points {
        return Err(AppError::InsufficientPoints {
            required: points_needed,
            available: user.points,
        });
    }

    user.points -= points_needed;
    update_balance(user);

    let request = WithdrawalRequest::pending(now, amount, points_needed);
    user.withdrawals.push(request.clone());
    info!(amount, points = points_needed, "withdrawal requested");
    Ok(request)
}

fn pending_request(user: &mut UserRecord, number: usize) -> AppResult<&mut WithdrawalRequest> {
    let len = user.withdrawals.len();
    if number == 0 || number > len {
        return Err(AppError::InvalidRequestNumber { number, len });
    }
    let request = &mut user.withdrawals[number - 1];
    if !request.status.is_pending() {
        return Err(AppError::RequestNotPending {
            number,
            status: request.status.to_string(),
        });
    }
    Ok(request)
}

/// `pending -> approved`. The points were already debited at request time.
pub fn approve_withdrawal(user: &mut UserRecord, number: usize) -> AppResult<WithdrawalRequest> {
    let request = pending_request(user, number)?;
    request.status = WithdrawalStatus::Approved;
    Ok(request.clone())
}

/// Result of a rejection: the finalized request and the points given back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refund {
    pub request: WithdrawalRequest,
    pub points_refunded: i64,
}

/// `pending -> rejected`, crediting back the held points.
pub fn reject_withdrawal(user: &mut UserRecord, number: usize) -> AppResult<Refund> {
    let points_refunded = pending_request(user, number)?
        .held_points(POINT_VALUE)
        .max(0);
    let points = credit(user.points, points_refunded)?;

    let request = pending_request(user, number)?;
    request.status = WithdrawalStatus::Rejected;
    let request = request.clone();

    user.points = points;
    update_balance(user);
    Ok(Refund {
        request,
        points_refunded,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub source: String,
    pub target: String,
    pub amount: i64,
    pub source_points: i64,
    pub target_points: i64,
}

/// Move `amount` points from `source` to `target`. Must run inside a store
/// transaction: the balance check here is the authoritative one.
pub fn transfer_points(
    ledger: &mut Ledger,
    source: &str,
    target: &str,
    amount: i64,
) -> AppResult<TransferReceipt> {
    if amount <= 0 {
        return Err(AppError::NonPositiveAmount(amount));
    }
    if source == target {
        return Err(AppError::SelfTransfer);
    }
    let Some(dst) = ledger.user(target) else {
        return Err(AppError::UnknownUser(target.to_string()));
    };
    let target_points = credit(dst.points, amount)?;

    let src = ledger.get_user(source, None);
    if amount > src.points {
        return Err(AppError::InsufficientPoints {
            required: amount,
            available: src.points,
        });
    }
    src.points -= amount;
    update_balance(src);
    let source_points = src.points;

    let dst = ledger.get_user(target, None);
    dst.points = target_points;
    update_balance(dst);

    info!(source, target, amount, "points transferred");
    Ok(TransferReceipt {
        source: source.to_string(),
        target: target.to_string(),
        amount,
        source_points,
        target_points,
    })
}

/// A pending request as seen from the admin queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWithdrawal {
    pub user_id: String,
    pub name: String,
    /// 1-based position in the owner's request list.
    pub number: usize,
    pub request: WithdrawalRequest,
}

/// Every pending request across the ledger, oldest first. Requests made at
/// the same minute keep user-id then number order.
pub fn pending_withdrawals(ledger: &Ledger) -> Vec<PendingWithdrawal> {
    let mut queue: Vec<PendingWithdrawal> = ledger
        .users
        .iter()
        .flat_map(|(uid, user)| {
            user.withdrawals
                .iter()
                .enumerate()
                .filter(|(_, req)| req.status.is_pending())
                .map(move |(i, req)| PendingWithdrawal {
                    user_id: uid.clone(),
                    name: user.display(uid).to_string(),
                    number: i + 1,
                    request: req.clone(),
                })
        })
        .collect();
    queue.sort_by(|a, b| a.request.datetime.cmp(&b.request.datetime));
    queue
}
