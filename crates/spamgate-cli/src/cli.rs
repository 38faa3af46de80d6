//! CLI command definitions and argument parsing.

use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// SpamGate - spam triage for support tickets.
#[derive(Debug, Parser)]
#[command(name = "spamgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ~/.spamgate/config.toml when present)
    #[arg(short, long, global = true, env = "SPAMGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON ticket file
    #[arg(
        short,
        long,
        global = true,
        env = "SPAMGATE_TICKETS",
        default_value = "tickets.json"
    )]
    pub tickets: PathBuf,

    /// API key, overrides the configuration file
    #[arg(long, global = true, env = "SPAMGATE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a ticket without changing it
    Analyze(TicketArgs),

    /// Analyze a ticket and close it when it is spam
    Close(TicketArgs),

    /// Run the new-ticket hook (closes spam when auto_close is on)
    Created(TicketArgs),

    /// Validate and display the active configuration
    CheckConfig,

    /// Write a configuration file
    InitConfig(InitConfigArgs),
}

impl Command {
    /// Whether the command reports an analysis result
    pub fn is_ticket_command(&self) -> bool {
        matches!(
            self,
            Command::Analyze(_) | Command::Close(_) | Command::Created(_)
        )
    }
}

/// Arguments for commands acting on one ticket.
#[derive(Debug, Args)]
pub struct TicketArgs {
    /// Ticket ID
    pub ticket_id: String,
}

/// Arguments for the init-config command.
#[derive(Debug, Args)]
pub struct InitConfigArgs {
    /// Output path (defaults to ~/.spamgate/config.toml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Starting point for the generated file
    #[arg(short, long, value_enum, default_value = "default")]
    pub preset: PresetArg,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    /// Defaults (AI when a key is set, auto-close on)
    Default,
    /// Analyze new tickets but never close them automatically
    ReviewOnly,
}
