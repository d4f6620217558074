use crate::utils::time::ledger_datetime;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
}

impl WithdrawalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalStatus::Pending => "pending",
            WithdrawalStatus::Approved => "approved",
            WithdrawalStatus::Rejected => "rejected",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, WithdrawalStatus::Pending)
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A withdrawal request. The points are debited when the request is created;
/// `points` remembers how many were held so a rejection can refund them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    #[serde(with = "ledger_datetime")]
    pub datetime: NaiveDateTime,
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    pub status: WithdrawalStatus,
}

impl WithdrawalRequest {
    pub fn pending(datetime: NaiveDateTime, amount: i64, points: i64) -> Self {
        Self {
            datetime,
            amount,
            points: Some(points),
            status: WithdrawalStatus::Pending,
        }
    }

    /// Points held by this request; requests written before `points` was
    /// stored fall back to `amount / point_value`.
    pub fn held_points(&self, point_value: i64) -> i64 {
        self.points.unwrap_or(self.amount / point_value)
    }
}
