use crate::App;
use crate::cli::parser::Commands;
use crate::core::backup::{BackupLogic, BackupOutcome, ask_overwrite};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub async fn handle(cmd: &Commands, app: &App) -> AppResult<()> {
    if let Commands::Backup { file, compress } = cmd {
        match BackupLogic::backup(&app.store, file, *compress, ask_overwrite).await? {
            BackupOutcome::Created(path) => {
                if *compress {
                    success(format!("Compressed backup created: {}", path.display()));
                } else {
                    success(format!("Backup created: {}", path.display()));
                }
            }
            BackupOutcome::Cancelled => info("Backup cancelled by user."),
        }
    }

    Ok(())
}
