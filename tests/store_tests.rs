use chrono::NaiveTime;
use rattendance::core::ledger::{self, LedgerContext};
use rattendance::core::notify::Outbox;
use rattendance::core::policy::Policy;
use rattendance::errors::AppError;
use rattendance::models::{CardKind, Ledger, WithdrawalStatus};
use rattendance::store::LedgerStore;
use std::fs;
use std::sync::Arc;

mod common;
use common::{Sandbox, clock, day, ledger_with, read_ledger};

const LEGACY: &str = r#"{
  "_config": { "unlimited_dates": ["2025-09-03"], "checkin_limit": "09:00" },
  "123": {
    "username": "alice",
    "first_name": "Alice",
    "active": true,
    "check_ins": [{ "datetime": "2025-09-01 08:40" }],
    "check_outs": [],
    "yellow_cards": [
      "Late check-in at 2025-09-01 08:40",
      "Manual yellow card at 2025-09-02 11:00: noise",
      { "date": "2025-09-05", "kind": "manual", "note": "structured" }
    ],
    "points": 3,
    "balance": 150000,
    "withdrawals": [
      { "datetime": "2025-09-01 10:00", "amount": 50000, "status": "pending" }
    ],
    "days": { "2025-09-01": { "note": "kept" } }
  },
  "456": { "username": "bob" }
}"#;

#[test]
fn legacy_document_loads_with_defaults() {
    let ledger: Ledger = serde_json::from_str(LEGACY).expect("legacy ledger parses");

    assert!(ledger.config.unlimited_dates.contains(&day("2025-09-03")));
    assert_eq!(ledger.config.checkin_limit, NaiveTime::from_hms_opt(9, 0, 0));
    assert_eq!(ledger.users.len(), 2);

    let alice = ledger.user("123").expect("alice");
    assert_eq!(alice.yellow_cards.len(), 3);
    assert_eq!(alice.yellow_cards[0].date, Some(day("2025-09-01")));
    assert_eq!(alice.yellow_cards[0].kind, CardKind::Late);
    assert_eq!(alice.yellow_cards[1].kind, CardKind::Manual);
    assert_eq!(alice.yellow_cards[1].date, Some(day("2025-09-02")));
    assert_eq!(alice.yellow_cards[2].note, "structured");
    assert_eq!(alice.withdrawals[0].status, WithdrawalStatus::Pending);
    assert_eq!(alice.withdrawals[0].points, None);
    assert!(alice.extra.contains_key("days"));

    let bob = ledger.user("456").expect("bob");
    assert!(!bob.active);
    assert_eq!(bob.points, 0);
    assert!(bob.top_awarded_dates.is_empty());
}

#[test]
fn unknown_fields_survive_a_save() {
    let ledger: Ledger = serde_json::from_str(LEGACY).expect("parse");
    let saved = serde_json::to_value(&ledger).expect("serialize");

    assert_eq!(saved["123"]["first_name"], "Alice");
    assert_eq!(saved["123"]["days"]["2025-09-01"]["note"], "kept");
    assert_eq!(saved["_config"]["checkin_limit"], "09:00");
    assert_eq!(saved["123"]["check_ins"][0]["datetime"], "2025-09-01 08:40");

    let reloaded: Ledger = serde_json::from_value(saved).expect("reload");
    assert_eq!(reloaded, ledger);
}

#[tokio::test]
async fn missing_or_blank_file_is_an_empty_ledger() {
    let sandbox = Sandbox::new();
    let store = LedgerStore::open(sandbox.data(), true);
    assert_eq!(store.snapshot().await.expect("missing file"), Ledger::default());

    fs::write(sandbox.data(), "  \n").expect("write blank");
    assert_eq!(store.snapshot().await.expect("blank file"), Ledger::default());
}

#[tokio::test]
async fn corrupt_file_is_moved_aside_in_lenient_mode() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.data(), "{ not json").expect("write corrupt");

    let store = LedgerStore::open(sandbox.data(), false);
    assert_eq!(store.snapshot().await.expect("lenient load"), Ledger::default());
    assert!(!sandbox.data().exists());

    let quarantined: Vec<String> = fs::read_dir(sandbox.dir.path())
        .expect("list dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("ledger.json.corrupt-"))
        .collect();
    assert_eq!(quarantined.len(), 1);
    let kept = fs::read_to_string(sandbox.path(&quarantined[0])).expect("read quarantined");
    assert_eq!(kept, "{ not json");
}

#[tokio::test]
async fn corrupt_file_is_an_error_in_strict_mode() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.data(), "[1, 2").expect("write corrupt");

    let store = LedgerStore::open(sandbox.data(), true);
    let err = store.snapshot().await.expect_err("strict load fails");
    assert!(matches!(err, AppError::CorruptStore { .. }));
    assert!(sandbox.data().exists());
}

#[tokio::test]
async fn transactions_persist_atomically() {
    let sandbox = Sandbox::new();
    sandbox.write_ledger(&ledger_with(&[("1", "alice")]));

    let store = LedgerStore::open(sandbox.data(), true);
    store
        .transaction(|l| {
            l.get_user("1", None).points = 9;
            Ok(())
        })
        .await
        .expect("commit");

    let failed: Result<(), AppError> = store
        .transaction(|l| {
            l.get_user("1", None).points = 100;
            Err(AppError::SelfTransfer)
        })
        .await;
    assert!(failed.is_err());

    let on_disk = read_ledger(&sandbox.data());
    assert_eq!(on_disk.user("1").map(|u| u.points), Some(9));
    assert!(!sandbox.path("ledger.json.tmp").exists());
}

fn ctx_parts() -> (Policy, Outbox) {
    (Policy::default(), Outbox::new())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn competing_withdrawals_are_serialized() {
    let sandbox = Sandbox::new();
    let mut ledger = ledger_with(&[("1", "alice")]);
    ledger.get_user("1", None).points = 1;
    sandbox.write_ledger(&ledger);

    let store = Arc::new(LedgerStore::open(sandbox.data(), true));
    let mut handles = Vec::new();
    for _ in 0..2 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let (policy, outbox) = ctx_parts();
            let clock = clock("2025-09-01 10:00");
            let ctx = LedgerContext::new(&clock, &policy, &outbox);
            ledger::request_withdrawal(&store, &ctx, "1", 50_000)
                .await
                .is_ok()
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.expect("task finished") {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);

    let alice = sandbox.read_ledger().users.remove("1").expect("alice");
    assert_eq!(alice.points, 0);
    assert_eq!(alice.withdrawals.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_transfers_conserve_points() {
    let sandbox = Sandbox::new();
    let mut ledger = ledger_with(&[("1", "alice"), ("2", "bob")]);
    ledger.get_user("1", None).points = 10;
    sandbox.write_ledger(&ledger);

    let store = Arc::new(LedgerStore::open(sandbox.data(), true));
    let mut handles = Vec::new();
    for _ in 0..15 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let (policy, outbox) = ctx_parts();
            let clock = clock("2025-09-01 10:00");
            let ctx = LedgerContext::new(&clock, &policy, &outbox);
            ledger::transfer(&store, &ctx, "1", "bob", 1).await.is_ok()
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.expect("task finished") {
            successes += 1;
        }
    }
    assert_eq!(successes, 10);

    let on_disk = sandbox.read_ledger();
    assert_eq!(on_disk.user("1").map(|u| u.points), Some(0));
    assert_eq!(on_disk.user("2").map(|u| u.points), Some(10));
}
