use super::user::UserRecord;
use crate::utils::time::optional_hhmm;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Ledger-wide settings editable at runtime by administrators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigRecord {
    /// Days on which nobody can be late.
    pub unlimited_dates: BTreeSet<NaiveDate>,
    /// Overrides the default check-in cutoff (not the short-day one).
    #[serde(with = "optional_hhmm")]
    pub checkin_limit: Option<NaiveTime>,
}

/// The whole persisted document: one record per user id plus the reserved
/// `_config` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(rename = "_config", default)]
    pub config: ConfigRecord,
    #[serde(flatten)]
    pub users: BTreeMap<String, UserRecord>,
}

impl Ledger {
    /// Fetch a user record, creating it with defaults on first interaction.
    /// A non-empty `username` refreshes the stored one.
    pub fn get_user(&mut self, uid: &str, username: Option<&str>) -> &mut UserRecord {
        let user = self.users.entry(uid.to_string()).or_default();
        if let Some(name) = username.map(str::trim).filter(|n| !n.is_empty())
            && user.username != name
        {
            user.username = name.to_string();
        }
        user
    }

    pub fn user(&self, uid: &str) -> Option<&UserRecord> {
        self.users.get(uid)
    }

    pub fn user_mut(&mut self, uid: &str) -> Option<&mut UserRecord> {
        self.users.get_mut(uid)
    }

    pub fn active_users(&self) -> impl Iterator<Item = (&String, &UserRecord)> {
        self.users.iter().filter(|(_, u)| u.active)
    }

    /// Resolve a user by id, or by username (case-insensitive, leading `@` ignored).
    pub fn resolve_user_id(&self, query: &str) -> Option<String> {
        let q = query.trim();
        if self.users.contains_key(q) {
            return Some(q.to_string());
        }
        let name = q.strip_prefix('@').unwrap_or(q).to_lowercase();
        if name.is_empty() {
            return None;
        }
        self.users
            .iter()
            .find(|(_, u)| u.username.to_lowercase() == name)
            .map(|(id, _)| id.clone())
    }
}
