//! rAttendance library root.
//! Exposes the CLI parser, the high-level run() function, and the ledger core.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

use crate::core::clock::{Clock, FixedClock, SystemClock};
use crate::core::ledger::LedgerContext;
use crate::core::notify::ConsoleNotifier;
use crate::core::policy::Policy;
use crate::store::LedgerStore;
use crate::utils::path::expand_tilde;
use crate::utils::time::parse_ledger_datetime;
use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use std::path::PathBuf;
use tracing::debug;

/// Everything a command handler needs, built once per invocation.
pub struct App {
    pub cfg: Config,
    pub config_path: PathBuf,
    pub policy: Policy,
    pub clock: Box<dyn Clock>,
    pub store: LedgerStore,
    pub notifier: ConsoleNotifier,
}

impl App {
    pub fn from_cli(cli: &Cli) -> AppResult<Self> {
        let config_path = cli
            .config
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(Config::config_file);
        let cfg = Config::load_from(&config_path)?;
        let policy = Policy::from_config(&cfg)?;

        let clock: Box<dyn Clock> = match &cli.now {
            Some(now) => Box::new(FixedClock(parse_ledger_datetime(now)?)),
            None => Box::new(SystemClock::new(policy.utc_offset)),
        };

        let data_path = match &cli.data {
            Some(custom) => expand_tilde(custom),
            None => cfg.data_path(&config_path),
        };
        debug!(
            config = %config_path.display(),
            data = %data_path.display(),
            "configuration loaded"
        );

        let store = LedgerStore::open(data_path, cfg.strict_load);
        Ok(Self {
            cfg,
            config_path,
            policy,
            clock,
            store,
            notifier: ConsoleNotifier,
        })
    }

    pub fn ctx(&self) -> LedgerContext<'_, ConsoleNotifier> {
        LedgerContext::new(self.clock.as_ref(), &self.policy, &self.notifier)
    }
}

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, app: &App) -> AppResult<()> {
    use crate::cli::commands;

    match &cli.command {
        Commands::Init => commands::init::handle(cli, app).await,
        Commands::Config { .. } => commands::config::handle(&cli.command, app),
        Commands::Checkin { .. }
        | Commands::Checkout { .. }
        | Commands::Ladder
        | Commands::History { .. } => commands::attendance::handle(&cli.command, app).await,
        Commands::Balance { .. }
        | Commands::Scores { .. }
        | Commands::Withdraw { .. }
        | Commands::Withdrawals { .. }
        | Commands::Approve { .. }
        | Commands::Reject { .. }
        | Commands::Transfer { .. } => commands::credits::handle(&cli.command, app).await,
        Commands::Yellow { .. } => commands::yellow::handle(&cli.command, app).await,
        Commands::User { .. } => commands::user::handle(&cli.command, app).await,
        Commands::Day { .. } => commands::day::handle(&cli.command, app).await,
        Commands::Report { .. } => commands::report::handle(&cli.command, app).await,
        Commands::Backup { .. } => commands::backup::handle(&cli.command, app).await,
    }
}

/// Entry point used by main.rs; the parsed CLI comes from there so the
/// tracing subscriber can be installed first.
pub async fn run(cli: Cli) -> AppResult<()> {
    let app = App::from_cli(&cli)?;
    dispatch(&cli, &app).await
}

/// Parse `std::env::args` into a [`Cli`].
pub fn parse_cli() -> Cli {
    Cli::parse()
}
