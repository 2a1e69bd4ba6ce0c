//! Command line definition

use clap::{Args, Parser, Subcommand, ValueEnum};
use punter_client::LogFormat;
use punter_protocol::{
    Filter, KycSortKey, RecipientSelection, SortDirection, TransactionSortKey, UserSortKey,
};
use punter_types::{KycStatus, Role, TransactionStatus, UserStatus};
use std::path::PathBuf;

/// Command line interface of the punter admin console
#[derive(Debug, Parser)]
#[command(
    name = "punter-admin",
    version = env!("CARGO_PKG_VERSION"),
    about = "Admin console for the punter platform",
    long_about = "Review KYC submissions and transactions, manage admins and users, \
                  send bulk email and inspect platform metrics from the terminal."
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format (pretty, json); overrides the config file
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// How results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text columns
    #[default]
    Table,
    /// Pretty printed JSON
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login {
        /// Admin email
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long, env = "PUNTER_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session token
    Logout,

    /// Show user, revenue and signal metrics
    Dashboard {
        /// Order months January to December instead of first-seen order
        #[arg(long)]
        calendar_order: bool,
    },

    /// Browse users and change their status
    Users {
        /// User subcommand
        #[command(subcommand)]
        action: UsersCommand,
    },

    /// Review transactions
    Transactions {
        /// Transaction subcommand
        #[command(subcommand)]
        action: TransactionsCommand,
    },

    /// Review KYC submissions
    Kyc {
        /// KYC subcommand
        #[command(subcommand)]
        action: KycCommand,
    },

    /// Manage admin accounts
    Admins {
        /// Admin subcommand
        #[command(subcommand)]
        action: AdminsCommand,
    },

    /// Compose bulk email
    Email {
        /// Email subcommand
        #[command(subcommand)]
        action: EmailCommand,
    },

    /// Inspect configuration
    Config {
        /// Config subcommand
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

/// Sort direction flag shared by list commands
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct DirectionArg {
    /// Sort direction (asc, desc); defaults to the column's natural direction
    #[arg(long, value_name = "DIR")]
    pub direction: Option<SortDirection>,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users
    List {
        /// Role filter (all, user, punter)
        #[arg(short, long, default_value = "all")]
        role: Filter<Role>,

        /// Case-insensitive search over name, email, username and bio
        #[arg(short, long, default_value = "")]
        search: String,

        /// Sort column (name, email, username, role, status, joined, balance)
        #[arg(long, default_value = "name")]
        sort: UserSortKey,

        /// Direction
        #[command(flatten)]
        direction: DirectionArg,
    },

    /// Show one user
    Show {
        /// User id
        id: String,
    },

    /// Change a user's status
    Status {
        /// User id
        id: String,

        /// New status (active, inactive, suspended)
        status: UserStatus,
    },
}

/// Transaction subcommands
#[derive(Debug, Subcommand)]
pub enum TransactionsCommand {
    /// List transactions, newest first by default
    List {
        /// Status filter (all, pending, completed, failed)
        #[arg(long, default_value = "all")]
        status: Filter<TransactionStatus>,

        /// Case-insensitive search over description, merchant, category, amount and type
        #[arg(short, long, default_value = "")]
        search: String,

        /// Sort column (date, amount)
        #[arg(long, default_value = "date")]
        sort: TransactionSortKey,

        /// Direction
        #[command(flatten)]
        direction: DirectionArg,
    },

    /// Show one transaction
    Show {
        /// Transaction id
        id: String,
    },

    /// Mark a pending transaction completed
    Approve {
        /// Transaction id
        id: String,
    },

    /// Mark a pending transaction failed
    Reject {
        /// Transaction id
        id: String,
    },
}

/// KYC subcommands
#[derive(Debug, Subcommand)]
pub enum KycCommand {
    /// List KYC submissions
    List {
        /// Status filter (all, pending, approved, rejected)
        #[arg(long, default_value = "all")]
        status: Filter<KycStatus>,

        /// Case-insensitive search over name, email, phone, id type and id number
        #[arg(short, long, default_value = "")]
        search: String,

        /// Sort column (submitted, name); backend order when omitted
        #[arg(long)]
        sort: Option<KycSortKey>,

        /// Direction
        #[command(flatten)]
        direction: DirectionArg,
    },

    /// Show one submission
    Show {
        /// Request id
        id: String,
    },

    /// Approve a pending submission
    Approve {
        /// Request id
        id: String,
    },

    /// Reject a pending submission
    Reject {
        /// Request id
        id: String,
    },
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminsCommand {
    /// List admins
    List,

    /// Create an admin; a password is generated from the names unless given
    Create {
        /// First name
        #[arg(long)]
        first_name: String,

        /// Last name
        #[arg(long)]
        last_name: String,

        /// Login email
        #[arg(long)]
        email: String,

        /// Explicit password
        #[arg(long)]
        password: Option<String>,
    },

    /// Delete an admin
    Delete {
        /// Admin id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Recipient group of a bulk email
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Audience {
    /// Every account with the user role
    AllUsers,
    /// Every account with the punter role
    AllPunters,
    /// One user, chosen with `--id`
    User,
    /// One punter, chosen with `--id`
    Punter,
}

impl Audience {
    /// Recipient selection for this audience
    pub fn selection(self, id: Option<String>) -> RecipientSelection {
        match self {
            Self::AllUsers => RecipientSelection::AllUsers,
            Self::AllPunters => RecipientSelection::AllPunters,
            Self::User => RecipientSelection::SpecificUser(id.unwrap_or_default()),
            Self::Punter => RecipientSelection::SpecificPunter(id.unwrap_or_default()),
        }
    }
}

/// Email subcommands
#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// List the accounts an audience can reach
    Recipients {
        /// Audience
        #[arg(long, value_enum, default_value_t = Audience::AllUsers)]
        to: Audience,
    },

    /// Compose and send
    Send {
        /// Audience
        #[arg(long, value_enum, default_value_t = Audience::AllUsers)]
        to: Audience,

        /// Recipient id for `user` and `punter`
        #[arg(long)]
        id: Option<String>,

        /// Subject line
        #[arg(short, long)]
        subject: String,

        /// Message body
        #[arg(short, long)]
        body: String,
    },
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration as TOML
    Show,
}

impl Command {
    /// Whether the command runs before a session exists
    pub const fn is_public(&self) -> bool {
        matches!(self, Self::Login { .. } | Self::Logout | Self::Config { .. })
    }
}
