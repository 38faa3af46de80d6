//! SpamGate CLI - spam triage for support tickets.

use anyhow::Context;
use clap::Parser;
use spamgate_cli::commands::{self, TicketAction};
use spamgate_cli::{config, Cli, Command, Formatter, OutputFormat};
use spamgate_domain::{AnalysisResult, TicketId};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        // Ticket commands always answer with a result document
        if cli.command.is_ticket_command() && cli.format == OutputFormat::Json {
            let result = AnalysisResult::failure(format!("Exception: {:#}", e));
            if let Ok(json) = serde_json::to_string_pretty(&result) {
                println!("{}", json);
            }
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let formatter = Formatter::new(cli.format, !cli.no_color);

    if let Command::InitConfig(args) = &cli.command {
        init_tracing(cli.verbose);
        println!("{}", commands::execute_init_config(args, &formatter)?);
        return Ok(());
    }

    let config = config::load_config(cli.config.as_deref(), cli.api_key.as_deref())
        .context("Failed to load configuration")?;
    init_tracing(cli.verbose || config.enable_logging);

    let (action, ticket_id) = match &cli.command {
        Command::Analyze(args) => (TicketAction::Analyze, &args.ticket_id),
        Command::Close(args) => (TicketAction::Close, &args.ticket_id),
        Command::Created(args) => (TicketAction::Created, &args.ticket_id),
        Command::CheckConfig => {
            println!("{}", commands::execute_check_config(&config, &formatter)?);
            return Ok(());
        }
        Command::InitConfig(_) => return Ok(()),
    };

    let id = TicketId::from(ticket_id.as_str());
    let result = commands::execute_ticket(action, &id, config, &cli.tickets)
        .with_context(|| format!("Failed to process ticket {}", id))?;

    let output = match result {
        Some(result) => formatter.format_result(&result)?,
        None => formatter.format_skipped(&id)?,
    };
    println!("{}", output);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
