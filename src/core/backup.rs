use crate::errors::{AppError, AppResult};
use crate::store::LedgerStore;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use zip::ZipWriter;
use zip::write::FileOptions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Created(PathBuf),
    Cancelled,
}

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the ledger file to `dest_file` while holding the store lock.
    /// `confirm` is asked before an existing destination is overwritten.
    pub async fn backup<C>(
        store: &LedgerStore,
        dest_file: &str,
        compress: bool,
        confirm: C,
    ) -> AppResult<BackupOutcome>
    where
        C: FnOnce(&Path) -> AppResult<bool>,
    {
        let dest = PathBuf::from(dest_file);
        store
            .with_locked_file(|src| {
                let src = src.ok_or_else(|| {
                    AppError::Backup("the ledger is not backed by a file".to_string())
                })?;
                backup_file(src, &dest, compress, confirm)
            })
            .await
    }
}

fn backup_file<C>(src: &Path, dest: &Path, compress: bool, confirm: C) -> AppResult<BackupOutcome>
where
    C: FnOnce(&Path) -> AppResult<bool>,
{
    if !src.exists() {
        return Err(AppError::Backup(format!(
            "Ledger file not found: {}",
            src.display()
        )));
    }

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    if dest.exists() && !confirm(dest)? {
        return Ok(BackupOutcome::Cancelled);
    }

    fs::copy(src, dest)?;

    let final_path = if compress {
        let compressed = compress_backup(dest)?;
        if compressed != dest {
            fs::remove_file(dest)?;
        }
        compressed
    } else {
        dest.to_path_buf()
    };

    info!(path = %final_path.display(), compress, "backup created");
    Ok(BackupOutcome::Created(final_path))
}

/// Interactive `[y/N]` overwrite prompt on stdin.
pub fn ask_overwrite(dest: &Path) -> AppResult<bool> {
    println!(
        "⚠️  The file '{}' already exists.\nDo you want to overwrite it? [y/N]: ",
        dest.display()
    );
    print!("> ");
    std::io::stdout().flush().ok();

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Compress a backup using .zip
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let mut zip_path = path.with_extension("zip");
    if zip_path == path {
        let mut name = zip_path.into_os_string();
        name.push(".zip");
        zip_path = PathBuf::from(name);
    }
    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let entry_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ledger.json".to_string());

    let mut f = fs::File::open(path)?;
    zip.start_file(entry_name, options)
        .map_err(|e| AppError::Backup(e.to_string()))?;
    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(|e| AppError::Backup(e.to_string()))?;

    Ok(zip_path)
}
