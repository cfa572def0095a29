//! Command-line interface definitions.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "tgc",
    about = "Operations console CLI: manage messaging accounts, proxies, automation tasks, and billing",
    version
)]
pub struct Args {
    /// API base URL (overrides the config file)
    #[arg(long, env = "TGC_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Path to the config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    /// Verbose logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Errors only
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and persist the session
    Login {
        /// Account email
        email: String,
        /// Password (prompted interactively when omitted)
        #[arg(long, env = "TGC_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// End the session
    Logout,

    /// Show the authenticated user
    Whoami,

    /// Messaging-account operations
    Accounts {
        #[command(subcommand)]
        command: AccountCommands,
    },

    /// Proxy-endpoint operations
    Proxies {
        #[command(subcommand)]
        command: ProxyCommands,
    },

    /// Automation-task operations
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Billing operations
    Billing {
        #[command(subcommand)]
        command: BillingCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum AccountCommands {
    /// List accounts
    List,
    /// Show one account
    Get { id: String },
    /// Bring an account online
    Connect { id: String },
    /// Take an account offline
    Disconnect { id: String },
    /// Query live account status
    Status { id: String },
    /// Delete an account
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ProxyCommands {
    /// List proxies
    List,
    /// Show one proxy
    Get { id: String },
    /// Probe reachability and latency
    Test { id: String },
    /// Delete a proxy
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum TaskCommands {
    /// List tasks
    List {
        /// Filter by status (pending, running, completed, failed, cancelled)
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one task
    Get { id: String },
    /// Show task progress
    Progress { id: String },
    /// Cancel a task
    Cancel { id: String },
}

#[derive(Debug, Subcommand)]
pub enum BillingCommands {
    /// List available plans
    Plans,
    /// Show the current subscription
    Subscription,
    /// List invoices
    Invoices,
    /// Open a hosted billing-portal session
    Portal,
}
