//! slotbook CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use slotbook_cli::cli::{Cli, Command, ConfigAction, NotificationAction};
use slotbook_cli::commands;
use slotbook_cli::error::CliResult;
use slotbook_cli::session::Session;
use slotbook_core::{TracingConfig, init_tracing};
use slotbook_engine::EngineConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = match cli.config {
        Some(ref path) => EngineConfig::load_from(path)?,
        None => EngineConfig::default(),
    };

    // Config commands never touch the snapshot
    if let Command::Config { action } = &cli.command {
        return match action {
            ConfigAction::Dump => commands::config::dump(&config, cli.config.as_deref()),
            ConfigAction::Validate => commands::config::validate(&config),
        };
    }

    let session = Session::open(&cli.data, &config, cli.now).await?;
    let json = cli.json;

    match &cli.command {
        Command::Book {
            provider,
            client,
            date,
        } => commands::book::book(&session, provider, client, *date, json).await?,
        Command::Day { provider, date } => {
            commands::availability::day(&session, provider, *date, json).await?
        }
        Command::Month {
            provider,
            year,
            month,
        } => commands::availability::month(&session, provider, *year, *month, json).await?,
        Command::Appointments { provider, date } => {
            commands::availability::appointments(&session, provider, *date, json).await?
        }
        Command::Notifications { action } => match action {
            NotificationAction::List { recipient, unread } => {
                commands::notifications::list(&session, recipient, *unread, json).await?
            }
            NotificationAction::Read { id } => {
                commands::notifications::read(&session, *id).await?
            }
        },
        Command::Config { .. } => {}
    }

    if cli.command.mutates() {
        session.persist().await?;
    }
    Ok(())
}
