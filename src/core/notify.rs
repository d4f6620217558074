//! Outbound notifications. Delivery is best effort: a failed notification is
//! logged and dropped, it never undoes a committed ledger change.

use std::future::Future;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
#[error("notification to {user_id} failed: {reason}")]
pub struct NotifyError {
    pub user_id: String,
    pub reason: String,
}

pub trait Notifier: Send + Sync {
    fn notify(
        &self,
        user_id: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Send and forget: failures are logged at `warn`.
pub async fn notify_best_effort<N: Notifier>(notifier: &N, user_id: &str, text: &str) {
    match notifier.notify(user_id, text).await {
        Ok(()) => debug!(user_id, "notification delivered"),
        Err(e) => warn!(error = %e, "notification dropped"),
    }
}

/// Prints notifications on stdout; the CLI stand-in for a chat transport.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    async fn notify(&self, user_id: &str, text: &str) -> Result<(), NotifyError> {
        println!("📨 [{}] {}", user_id, text);
        Ok(())
    }
}

/// Collects notifications in memory instead of delivering them.
#[derive(Debug, Default)]
pub struct Outbox {
    sent: Mutex<Vec<(String, String)>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Notifier for Outbox {
    async fn notify(&self, user_id: &str, text: &str) -> Result<(), NotifyError> {
        let mut sent = self.sent.lock().map_err(|_| NotifyError {
            user_id: user_id.to_string(),
            reason: "outbox poisoned".to_string(),
        })?;
        sent.push((user_id.to_string(), text.to_string()));
        Ok(())
    }
}

/// Drops every notification with an error; a transport that is down.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unreachable;

impl Notifier for Unreachable {
    async fn notify(&self, user_id: &str, _text: &str) -> Result<(), NotifyError> {
        Err(NotifyError {
            user_id: user_id.to_string(),
            reason: "transport unavailable".to_string(),
        })
    }
}
