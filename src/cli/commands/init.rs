use crate::App;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the configuration file (unless running in test mode)
///  - the ledger file, if it does not exist yet
pub async fn handle(cli: &Cli, app: &App) -> AppResult<()> {
    Config::init_all(&app.config_path, cli.data.clone(), cli.test)?;

    let data_path = app
        .store
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    println!("⚙️  Initializing rAttendance…");
    println!("📄 Config file : {}", app.config_path.display());
    println!("🗄️  Ledger      : {}", data_path);

    // an empty transaction writes a missing ledger and rewrites an existing
    // one unchanged
    let users = app
        .store
        .transaction(|ledger| Ok(ledger.users.len()))
        .await?;

    println!("✅ Ledger ready at {} ({} users)", data_path, users);
    println!("🎉 rAttendance initialization completed!");
    Ok(())
}
