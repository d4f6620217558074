//! Unified application error type.
//! All modules (store, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Ledger store
    // ---------------------------
    #[error("Ledger serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ledger file {path} is corrupt: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    #[error("Invalid UTC offset: {0}")]
    InvalidOffset(String),

    // ---------------------------
    // Ledger validation
    // ---------------------------
    #[error("Amount must be positive (got {0})")]
    NonPositiveAmount(i64),

    #[error("Amount {amount} is not a multiple of the point value {point_value}")]
    NotPointMultiple { amount: i64, point_value: i64 },

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: i64, available: i64 },

    #[error("Insufficient points: required {required}, available {available}")]
    InsufficientPoints { required: i64, available: i64 },

    #[error("Points out of range: {points} + {added} overflows")]
    PointsOverflow { points: i64, added: i64 },

    #[error("Cannot transfer points to the same account")]
    SelfTransfer,

    #[error("User not found: {0}")]
    UnknownUser(String),

    #[error("Account {0} has not been activated")]
    InactiveUser(String),

    #[error("Invalid request number {number} (user has {len} withdrawal requests)")]
    InvalidRequestNumber { number: usize, len: usize },

    #[error("Withdrawal request {number} is already {status}")]
    RequestNotPending { number: usize, status: String },

    #[error("Invalid card number {number} (user has {len} yellow cards)")]
    InvalidCardNumber { number: usize, len: usize },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Backup errors
    // ---------------------------
    #[error("Backup error: {0}")]
    Backup(String),
}

pub type AppResult<T> = Result<T, AppError>;
