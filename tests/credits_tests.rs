use rattendance::core::credits::{
    POINT_VALUE, approve_withdrawal, get_balance, pending_withdrawals, reject_withdrawal,
    request_withdrawal, transfer_points, update_balance,
};
use rattendance::core::rewards::points_leaderboard;
use rattendance::core::ledger::{self, LedgerContext};
use rattendance::core::notify::{Outbox, Unreachable};
use rattendance::core::policy::Policy;
use rattendance::errors::AppError;
use rattendance::models::WithdrawalStatus;
use rattendance::store::LedgerStore;

mod common;
use common::{active_user, at, clock, ledger_with};

#[test]
fn balance_follows_points() {
    let mut user = active_user("alice");
    user.points = 7;
    user.balance = 123;
    assert_eq!(get_balance(&mut user), 7 * POINT_VALUE);
    assert_eq!(user.balance, 350_000);
}

#[test]
fn withdrawal_validation_order() {
    let now = at("2025-09-01 10:00");
    let mut user = active_user("alice");
    user.points = 3;

    assert!(matches!(
        request_withdrawal(&mut user, 0, now),
        Err(AppError::NonPositiveAmount(0))
    ));
    assert!(matches!(
        request_withdrawal(&mut user, -50_000, now),
        Err(AppError::NonPositiveAmount(-50_000))
    ));
    assert!(matches!(
        request_withdrawal(&mut user, 75_000, now),
        Err(AppError::NotPointMultiple { amount: 75_000, .. })
    ));
    assert!(matches!(
        request_withdrawal(&mut user, 200_000, now),
        Err(AppError::InsufficientBalance {
            requested: 200_000,
            available: 150_000
        })
    ));
    assert!(user.withdrawals.is_empty());
    assert_eq!(user.points, 3);
}

#[test]
fn withdrawal_holds_points_until_decided() {
    let now = at("2025-09-01 10:00");
    let mut user = active_user("alice");
    user.points = 5;

    let req = request_withdrawal(&mut user, 100_000, now).expect("enough points");
    assert_eq!(req.status, WithdrawalStatus::Pending);
    assert_eq!(req.points, Some(2));
    assert_eq!(user.points, 3);
    assert_eq!(user.balance, 150_000);

    let approved = approve_withdrawal(&mut user, 1).expect("pending");
    assert_eq!(approved.status, WithdrawalStatus::Approved);
    assert_eq!(user.points, 3);

    assert!(matches!(
        approve_withdrawal(&mut user, 1),
        Err(AppError::RequestNotPending { number: 1, .. })
    ));
    assert!(matches!(
        reject_withdrawal(&mut user, 1),
        Err(AppError::RequestNotPending { number: 1, .. })
    ));
    assert!(matches!(
        approve_withdrawal(&mut user, 2),
        Err(AppError::InvalidRequestNumber { number: 2, len: 1 })
    ));
}

#[test]
fn rejecting_restores_points() {
    let mut user = active_user("alice");
    user.points = 4;

    request_withdrawal(&mut user, 150_000, at("2025-09-01 10:00")).expect("request");
    assert_eq!(user.points, 1);

    let refund = reject_withdrawal(&mut user, 1).expect("reject");
    assert_eq!(refund.points_refunded, 3);
    assert_eq!(refund.request.status, WithdrawalStatus::Rejected);
    assert_eq!(user.points, 4);
    assert_eq!(user.balance, 200_000);
}

#[test]
fn legacy_request_without_points_refunds_from_amount() {
    let mut user = active_user("alice");
    user.points = 2;
    request_withdrawal(&mut user, 100_000, at("2025-09-01 10:00")).expect("request");
    user.withdrawals[0].points = None;

    let refund = reject_withdrawal(&mut user, 1).expect("reject");
    assert_eq!(refund.points_refunded, 2);
    assert_eq!(user.points, 2);
}

#[test]
fn transfer_rules() {
    let mut ledger = ledger_with(&[("1", "alice"), ("2", "bob")]);
    ledger.get_user("1", None).points = 5;

    assert!(matches!(
        transfer_points(&mut ledger, "1", "2", 0),
        Err(AppError::NonPositiveAmount(0))
    ));
    assert!(matches!(
        transfer_points(&mut ledger, "1", "1", 1),
        Err(AppError::SelfTransfer)
    ));
    assert!(matches!(
        transfer_points(&mut ledger, "1", "9", 1),
        Err(AppError::UnknownUser(_))
    ));
    assert!(matches!(
        transfer_points(&mut ledger, "1", "2", 6),
        Err(AppError::InsufficientPoints {
            required: 6,
            available: 5
        })
    ));

    let receipt = transfer_points(&mut ledger, "1", "2", 2).expect("transfer");
    assert_eq!(receipt.source_points, 3);
    assert_eq!(receipt.target_points, 2);
    assert_eq!(ledger.user("2").map(|u| u.balance), Some(100_000));
}

#[tokio::test]
async fn transfer_by_username_notifies_recipient() {
    let mut ledger = ledger_with(&[("1", "alice"), ("2", "Bob")]);
    ledger.get_user("1", None).points = 3;
    let store = LedgerStore::in_memory(ledger);
    let policy = Policy::default();
    let outbox = Outbox::new();
    let clock = clock("2025-09-01 10:00");
    let ctx = LedgerContext::new(&clock, &policy, &outbox);

    let receipt = ledger::transfer(&store, &ctx, "1", "@bob", 2)
        .await
        .expect("transfer");
    assert_eq!(receipt.target, "2");

    let sent = outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "2");
    assert!(sent[0].1.contains("2 points"));

    let err = ledger::transfer(&store, &ctx, "1", "@nobody", 1)
        .await
        .expect_err("unknown target");
    assert!(matches!(err, AppError::UnknownUser(_)));
}

#[tokio::test]
async fn decisions_notify_the_requester() {
    let mut ledger = ledger_with(&[("1", "alice")]);
    ledger.get_user("1", None).points = 4;
    let store = LedgerStore::in_memory(ledger);
    let policy = Policy::default();
    let outbox = Outbox::new();
    let clock = clock("2025-09-01 10:00");
    let ctx = LedgerContext::new(&clock, &policy, &outbox);

    let first = ledger::request_withdrawal(&store, &ctx, "1", 50_000)
        .await
        .expect("request");
    assert_eq!(first.number, 1);
    let second = ledger::request_withdrawal(&store, &ctx, "1", 100_000)
        .await
        .expect("request");
    assert_eq!(second.number, 2);
    assert_eq!(second.points, 1);

    ledger::approve_withdrawal(&store, &ctx, "1", 1)
        .await
        .expect("approve");
    let refund = ledger::reject_withdrawal(&store, &ctx, "1", 2)
        .await
        .expect("reject");
    assert_eq!(refund.points_refunded, 2);

    let sent = outbox.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].1.contains("approved"));
    assert!(sent[1].1.contains("rejected"));

    let snapshot = store.snapshot().await.expect("snapshot");
    let alice = snapshot.user("1").expect("alice");
    assert_eq!(alice.points, 3);
    assert_eq!(alice.withdrawals[0].status, WithdrawalStatus::Approved);
    assert_eq!(alice.withdrawals[1].status, WithdrawalStatus::Rejected);
}

#[tokio::test]
async fn failed_notification_does_not_undo_the_change() {
    let mut ledger = ledger_with(&[("1", "alice")]);
    ledger.get_user("1", None).points = 2;
    let store = LedgerStore::in_memory(ledger);
    let policy = Policy::default();
    let clock = clock("2025-09-01 10:00");
    let ctx = LedgerContext::new(&clock, &policy, &Unreachable);

    ledger::request_withdrawal(&store, &ctx, "1", 50_000)
        .await
        .expect("request");
    ledger::approve_withdrawal(&store, &ctx, "1", 1)
        .await
        .expect("approval survives a dead transport");

    let snapshot = store.snapshot().await.expect("snapshot");
    let alice = snapshot.user("1").expect("alice");
    assert_eq!(alice.withdrawals[0].status, WithdrawalStatus::Approved);
    assert_eq!(alice.points, 1);
}

#[tokio::test]
async fn failed_request_leaves_the_store_untouched() {
    let store = LedgerStore::in_memory(ledger_with(&[("1", "alice")]));
    let policy = Policy::default();
    let outbox = Outbox::new();
    let clock = clock("2025-09-01 10:00");
    let ctx = LedgerContext::new(&clock, &policy, &outbox);

    let before = store.snapshot().await.expect("snapshot");
    let err = ledger::request_withdrawal(&store, &ctx, "1", 50_000)
        .await
        .expect_err("no points");
    assert!(matches!(err, AppError::InsufficientBalance { .. }));
    assert_eq!(store.snapshot().await.expect("snapshot"), before);
}

#[tokio::test]
async fn yellow_card_admin_operations_notify() {
    let store = LedgerStore::in_memory(ledger_with(&[("1", "alice")]));
    let policy = Policy::default();
    let outbox = Outbox::new();
    let clock = clock("2025-09-01 10:00");
    let ctx = LedgerContext::new(&clock, &policy, &outbox);

    let card = ledger::give_yellow(&store, &ctx, "1", "missed standup")
        .await
        .expect("give");
    assert!(card.note.contains("missed standup"));
    let removed = ledger::remove_yellow(&store, &ctx, "1", 1)
        .await
        .expect("remove");
    assert_eq!(removed, card);

    assert!(matches!(
        ledger::give_yellow(&store, &ctx, "9", "ghost").await,
        Err(AppError::UnknownUser(_))
    ));
    assert_eq!(outbox.sent().len(), 2);
}

#[test]
fn pending_queue_spans_all_users_oldest_first() {
    let mut ledger = ledger_with(&[("1", "alice"), ("2", "bob"), ("3", "carol")]);
    ledger.get_user("1", None).points = 5;
    ledger.get_user("2", None).points = 5;

    let alice = ledger.get_user("1", None);
    request_withdrawal(alice, 50_000, at("2025-09-01 10:00")).expect("first");
    request_withdrawal(alice, 100_000, at("2025-09-01 12:00")).expect("second");
    approve_withdrawal(alice, 1).expect("approve");
    let bob = ledger.get_user("2", None);
    request_withdrawal(bob, 150_000, at("2025-09-01 11:00")).expect("bob");

    let queue = pending_withdrawals(&ledger);
    let summary: Vec<(&str, usize, i64)> = queue
        .iter()
        .map(|p| (p.user_id.as_str(), p.number, p.request.amount))
        .collect();
    assert_eq!(summary, vec![("2", 1, 150_000), ("1", 2, 100_000)]);
    assert_eq!(queue[0].name, "bob");

    reject_withdrawal(ledger.get_user("2", None), 1).expect("reject");
    reject_withdrawal(ledger.get_user("1", None), 2).expect("reject");
    assert!(pending_withdrawals(&ledger).is_empty());
}

#[test]
fn leaderboard_ranks_by_points() {
    let mut ledger = ledger_with(&[("1", "alice"), ("2", "bob"), ("3", "carol")]);
    ledger.get_user("1", None).points = 2;
    ledger.get_user("2", None).points = 7;
    ledger.get_user("3", None).points = 2;
    ledger.get_user("3", None).display_name = "Carol C.".to_string();

    let rows = points_leaderboard(&ledger);
    let order: Vec<(usize, &str, i64)> = rows
        .iter()
        .map(|r| (r.rank, r.name.as_str(), r.points))
        .collect();
    assert_eq!(order, vec![(1, "bob", 7), (2, "alice", 2), (3, "Carol C.", 2)]);
    assert_eq!(rows[0].value, 350_000);
}

#[test]
fn extreme_point_values_do_not_overflow() {
    let mut rich = active_user("rich");
    rich.points = i64::MAX / 10_000;
    update_balance(&mut rich);
    assert_eq!(rich.balance, i64::MAX);

    let mut ledger = ledger_with(&[("1", "alice"), ("2", "bob")]);
    ledger.get_user("1", None).points = 10;
    ledger.get_user("2", None).points = i64::MAX - 5;
    assert!(matches!(
        transfer_points(&mut ledger, "1", "2", 10),
        Err(AppError::PointsOverflow { added: 10, .. })
    ));
    assert_eq!(ledger.user("1").map(|u| u.points), Some(10));
    assert_eq!(ledger.user("2").map(|u| u.points), Some(i64::MAX - 5));

    let mut user = active_user("alice");
    user.points = 3;
    request_withdrawal(&mut user, 100_000, at("2025-09-01 10:00")).expect("request");
    user.points = i64::MAX;
    assert!(matches!(
        reject_withdrawal(&mut user, 1),
        Err(AppError::PointsOverflow { added: 2, .. })
    ));
    assert_eq!(user.withdrawals[0].status, WithdrawalStatus::Pending);
}
