use crate::App;
use crate::cli::parser::{Commands, UserAction};
use crate::core::ledger;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub async fn handle(cmd: &Commands, app: &App) -> AppResult<()> {
    let Commands::User { action } = cmd else {
        return Ok(());
    };

    let (user, active, name) = match action {
        UserAction::Activate { user, name } => (user, true, name.as_deref()),
        UserAction::Deactivate { user } => (user, false, None),
    };

    let changed = ledger::set_active(&app.store, user, active, name).await?;
    let state = if active { "active" } else { "inactive" };
    if changed {
        success(format!("User {} is now {}.", user, state));
    } else {
        info(format!("User {} was already {}.", user, state));
    }
    Ok(())
}
