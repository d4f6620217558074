//! The ledger store: one JSON document behind one process-wide lock.
//!
//! Every operation runs as a transaction: take the lock, load the whole
//! ledger, mutate it in memory, write the whole document back, release. Two
//! operations can never interleave their read and write phases, which is what
//! keeps once-per-day rules and point balances consistent.

use crate::errors::{AppError, AppResult};
use crate::models::Ledger;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

enum Backend {
    File { path: PathBuf, strict: bool },
    Memory(Ledger),
}

impl Backend {
    async fn load(&self) -> AppResult<Ledger> {
        match self {
            Backend::File { path, strict } => load_file(path, *strict).await,
            Backend::Memory(ledger) => Ok(ledger.clone()),
        }
    }

    async fn persist(&mut self, ledger: Ledger) -> AppResult<()> {
        match self {
            Backend::File { path, .. } => persist_file(path, &ledger).await,
            Backend::Memory(current) => {
                *current = ledger;
                Ok(())
            }
        }
    }
}

pub struct LedgerStore {
    path: Option<PathBuf>,
    backend: Mutex<Backend>,
}

impl LedgerStore {
    /// File-backed store. With `strict`, a corrupt file is an error instead
    /// of being moved aside and replaced by an empty ledger.
    pub fn open(path: impl Into<PathBuf>, strict: bool) -> Self {
        let path = path.into();
        Self {
            path: Some(path.clone()),
            backend: Mutex::new(Backend::File { path, strict }),
        }
    }

    /// Store kept entirely in memory; same locking, no file.
    pub fn in_memory(ledger: Ledger) -> Self {
        Self {
            path: None,
            backend: Mutex::new(Backend::Memory(ledger)),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `f` against the freshly loaded ledger and persist the result.
    /// If `f` fails nothing is written.
    pub async fn transaction<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Ledger) -> AppResult<T>,
    {
        let mut backend = self.backend.lock().await;
        let mut ledger = backend.load().await?;
        let out = f(&mut ledger)?;
        backend.persist(ledger).await?;
        debug!("ledger transaction committed");
        Ok(out)
    }

    /// Read-only view under the same lock.
    pub async fn read<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Ledger) -> AppResult<T>,
    {
        let backend = self.backend.lock().await;
        let ledger = backend.load().await?;
        f(&ledger)
    }

    pub async fn snapshot(&self) -> AppResult<Ledger> {
        self.read(|l| Ok(l.clone())).await
    }

    /// Hold the lock while `f` works on the backing file directly (backups).
    pub async fn with_locked_file<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(Option<&Path>) -> AppResult<T>,
    {
        let _backend = self.backend.lock().await;
        f(self.path.as_deref())
    }
}

async fn load_file(path: &Path, strict: bool) -> AppResult<Ledger> {
    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "ledger file missing, starting empty");
            return Ok(Ledger::default());
        }
        Err(e) => return Err(e.into()),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Ledger::default());
    }

    match serde_json::from_slice::<Ledger>(&bytes) {
        Ok(ledger) => Ok(ledger),
        Err(e) if strict => Err(AppError::CorruptStore {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
        Err(e) => {
            let aside = quarantine_path(path);
            tokio::fs::rename(path, &aside).await?;
            warn!(
                path = %path.display(),
                moved_to = %aside.display(),
                error = %e,
                "ledger file is corrupt; moved aside and starting empty"
            );
            Ok(Ledger::default())
        }
    }
}

async fn persist_file(path: &Path, ledger: &Ledger) -> AppResult<()> {
    let body = serde_json::to_vec_pretty(ledger)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    // write a sibling temp file, then rename over the target
    let tmp = sibling_with_suffix(path, ".tmp");
    if let Err(e) = tokio::fs::write(&tmp, &body).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

fn quarantine_path(path: &Path) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%d%H%M%S");
    sibling_with_suffix(path, &format!(".corrupt-{stamp}"))
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "ledger.json".into());
    name.push(suffix);
    path.with_file_name(name)
}
