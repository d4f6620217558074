#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime};
use rattendance::core::clock::FixedClock;
use rattendance::models::{Ledger, UserRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn rat() -> Command {
    cargo_bin_cmd!("rattendance")
}

/// `YYYY-MM-DD HH:MM` to a timestamp.
pub fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").expect("valid test timestamp")
}

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

pub fn clock(s: &str) -> FixedClock {
    FixedClock(at(s))
}

pub fn active_user(username: &str) -> UserRecord {
    UserRecord {
        username: username.to_string(),
        active: true,
        ..UserRecord::default()
    }
}

/// Ledger with the given `(id, username)` users, all active.
pub fn ledger_with(users: &[(&str, &str)]) -> Ledger {
    let mut ledger = Ledger::default();
    for (id, name) in users {
        ledger.users.insert(id.to_string(), active_user(name));
    }
    ledger
}

/// Temp directory holding a ledger file and a config file for one test.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn data(&self) -> PathBuf {
        self.dir.path().join("ledger.json")
    }

    pub fn config(&self) -> PathBuf {
        self.dir.path().join("rattendance.conf")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_ledger(&self, ledger: &Ledger) {
        fs::write(self.data(), serde_json::to_vec_pretty(ledger).expect("serialize"))
            .expect("write ledger");
    }

    pub fn read_ledger(&self) -> Ledger {
        read_ledger(&self.data())
    }

    /// Command with `--config`, `--data` and a frozen clock.
    pub fn cmd(&self, now: &str) -> Command {
        let config = self.config().to_string_lossy().to_string();
        let data = self.data().to_string_lossy().to_string();
        let mut cmd = rat();
        cmd.args([
            "--config",
            config.as_str(),
            "--data",
            data.as_str(),
            "--test",
            "--now",
            now,
        ]);
        cmd
    }
}

pub fn read_ledger(path: &Path) -> Ledger {
    let bytes = fs::read(path).expect("read ledger");
    serde_json::from_slice(&bytes).expect("parse ledger")
}
