use clap::{Parser, Subcommand};

/// Command-line interface definition for rAttendance
/// CLI application to track attendance, points and credits in a JSON ledger
#[derive(Parser)]
#[command(
    name = "rattendance",
    version = env!("CARGO_PKG_VERSION"),
    about = "A team attendance ledger: check-ins, yellow cards, early-bird points and credit withdrawals",
    long_about = None
)]
pub struct Cli {
    /// Override the configuration file path
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<String>,

    /// Override the ledger file path (useful for tests or a custom ledger)
    #[arg(global = true, long = "data", value_name = "FILE")]
    pub data: Option<String>,

    /// Freeze the clock at "YYYY-MM-DD HH:MM"
    #[arg(global = true, long = "now", hide = true)]
    pub now: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Diagnostic log level written to stderr (error, warn, info, debug, trace)
    #[arg(global = true, long = "log-level", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration file and the ledger
    Init,

    /// Manage the configuration file (view, check, migrate or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/vim/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Record today's check-in
    Checkin {
        #[arg(long, short = 'u', help = "User id")]
        user: String,

        #[arg(long, help = "Username stored on first contact")]
        name: Option<String>,
    },

    /// Record today's check-out
    Checkout {
        #[arg(long, short = 'u', help = "User id")]
        user: String,
    },

    /// Show today's early-bird ladder
    Ladder,

    /// Show a user's points and credit balance
    Balance {
        #[arg(long, short = 'u')]
        user: String,
    },

    /// Rank every user by points
    Scores {
        #[arg(long, short = 'u', help = "Also show this user's standing")]
        user: Option<String>,
    },

    /// List a user's check-ins (or check-outs)
    History {
        #[arg(long, short = 'u')]
        user: String,

        #[arg(long = "outs", help = "List check-outs instead of check-ins")]
        outs: bool,
    },

    /// Request a credit withdrawal
    Withdraw {
        #[arg(long, short = 'u')]
        user: String,

        #[arg(long, short = 'a', allow_negative_numbers = true)]
        amount: i64,
    },

    /// List a user's withdrawal requests, or every pending one
    Withdrawals {
        #[arg(
            long,
            short = 'u',
            required_unless_present = "pending",
            conflicts_with = "pending"
        )]
        user: Option<String>,

        #[arg(long, help = "List pending requests across all users")]
        pending: bool,
    },

    /// Approve a pending withdrawal request
    Approve {
        #[arg(long, short = 'u')]
        user: String,

        #[arg(long = "request", short = 'r', help = "Request number (1-based)")]
        request: usize,
    },

    /// Reject a pending withdrawal request and refund its points
    Reject {
        #[arg(long, short = 'u')]
        user: String,

        #[arg(long = "request", short = 'r', help = "Request number (1-based)")]
        request: usize,
    },

    /// Transfer points to another user
    Transfer {
        #[arg(long, help = "Source user id")]
        from: String,

        #[arg(long, help = "Target user id or username (leading @ is ignored)")]
        to: String,

        #[arg(long, short = 'a', allow_negative_numbers = true)]
        amount: i64,
    },

    /// Manage yellow cards
    Yellow {
        #[command(subcommand)]
        action: YellowAction,
    },

    /// Manage user records
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Per-day check-in rules
    Day {
        #[command(subcommand)]
        action: DayAction,
    },

    /// Average check-in time per user
    Report {
        #[arg(long, default_value_t = 30, allow_negative_numbers = true)]
        days: i64,

        #[arg(long = "exclude-users", value_delimiter = ',', help = "Usernames to leave out")]
        exclude_users: Vec<String>,

        #[arg(
            long = "exclude-weekdays",
            help = "Weekdays to skip (names or 0-6, Monday = 0); defaults to the short day"
        )]
        exclude_weekdays: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },

    /// Create a backup copy of the ledger
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,
    },
}

#[derive(Subcommand)]
pub enum YellowAction {
    /// List a user's yellow cards
    List {
        #[arg(long, short = 'u')]
        user: String,
    },
    /// Issue a manual yellow card
    Give {
        #[arg(long, short = 'u')]
        user: String,

        #[arg(long)]
        reason: String,
    },
    /// Remove a yellow card by number (no points are refunded)
    Remove {
        #[arg(long, short = 'u')]
        user: String,

        #[arg(long, short = 'n', help = "Card number (1-based)")]
        number: usize,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Allow the user to check in
    Activate {
        #[arg(long, short = 'u')]
        user: String,

        #[arg(long, help = "Display name")]
        name: Option<String>,
    },
    /// Block the user's check-ins
    Deactivate {
        #[arg(long, short = 'u')]
        user: String,
    },
}

#[derive(Subcommand)]
pub enum DayAction {
    /// Nobody is late on this day
    Unlimit {
        #[arg(long, help = "Date (YYYY-MM-DD), default today")]
        date: Option<String>,
    },
    /// Override (or clear) the regular-day check-in cutoff
    Limit {
        #[arg(value_name = "HH:MM", required_unless_present = "clear")]
        time: Option<String>,

        #[arg(long, conflicts_with = "time")]
        clear: bool,
    },
}
