use super::event::Event;
use super::withdrawal::WithdrawalRequest;
use super::yellow_card::YellowCard;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Everything the ledger knows about one user. Every field is defaulted so
/// records written by older versions load without special cases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    pub username: String,
    pub display_name: String,
    pub active: bool,
    pub check_ins: Vec<Event>,
    pub check_outs: Vec<Event>,
    pub yellow_cards: Vec<YellowCard>,
    pub points: i64,
    /// Derived: always `points * POINT_VALUE` after `credits::update_balance`.
    pub balance: i64,
    pub overtime_minutes_bank: i64,
    pub top_awarded_dates: BTreeSet<NaiveDate>,
    pub team_awarded_dates: BTreeSet<NaiveDate>,
    pub withdrawals: Vec<WithdrawalRequest>,
    pub tasks: Vec<Value>,
    pub tasks_done: Vec<Value>,
    /// Fields this version does not interpret (`days`, `first_name`, ...),
    /// kept so a load/save cycle never drops data.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl UserRecord {
    /// Name shown in ladders and messages: display name, then username, then id.
    pub fn display<'a>(&'a self, fallback_id: &'a str) -> &'a str {
        if !self.display_name.trim().is_empty() {
            &self.display_name
        } else if !self.username.trim().is_empty() {
            &self.username
        } else {
            fallback_id
        }
    }
}
