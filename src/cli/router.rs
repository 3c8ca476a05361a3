//! Command routing and execution
//!
//! Dispatches exactly one lifecycle operation per invocation and prints its
//! outcome. Reports go to stdout; warnings go to stderr.

use anyhow::Result;

use crate::app::SessionContext;
use crate::cli::args::{Commands, ConfigCommands};
use crate::cli::display::{abort_message, exit_messages, purge_message, ReportDisplay};
use crate::config::{format_value, parse_cli_value, ConfigKey};
use crate::session::{ExitOutcome, PurgeOutcome};

fn warn_all(warnings: &[String]) {
    for warning in warnings {
        if warning.starts_with("Warning:") {
            eprintln!("{warning}");
        } else {
            eprintln!("Warning: {warning}");
        }
    }
}

fn print_report(report: &impl ReportDisplay, json: bool) -> Result<()> {
    warn_all(&report.warnings());
    if json {
        println!("{}", serde_json::to_string_pretty(&report.format_json())?);
    } else {
        print!("{}", report.format_default());
    }
    Ok(())
}

/// Execute a parsed subcommand against the session context
pub async fn execute_command(context: &SessionContext, command: Commands) -> Result<()> {
    let lifecycle = &context.lifecycle;

    match command {
        Commands::Open { session, reference } => {
            let outcome = lifecycle.open(&session, reference.as_deref()).await?;
            println!("Session '{}' started at {}", outcome.name, outcome.commit);
        }
        Commands::Resume { session } => {
            let outcome = lifecycle.resume(&session).await?;
            warn_all(&outcome.warnings);
            println!("Switched to session '{}'", outcome.name);
        }
        Commands::BranchOff { name } => {
            let outcome = lifecycle.branch_off(&name).await?;
            println!(
                "Created branch '{}' from session '{}'",
                outcome.branch, outcome.name
            );
        }
        Commands::SaveBack { name } => {
            let outcome = lifecycle.save_back(&name).await?;
            warn_all(&outcome.warnings);
            println!(
                "Successfully saved changes from session '{}' to branch '{}'",
                outcome.name, outcome.original_ref
            );
        }
        Commands::Exit(args) => {
            let outcome = lifecycle.exit(args.mode()).await?;
            if let ExitOutcome::Exited { warnings, .. } = &outcome {
                warn_all(warnings);
            }
            for line in exit_messages(&outcome) {
                println!("{line}");
            }
        }
        Commands::Status { json } => {
            let report = lifecycle.status().await?;
            print_report(&report, json)?;
        }
        Commands::List { json } => {
            let listing = lifecycle.list().await?;
            print_report(&listing, json)?;
        }
        Commands::Purge { session } => {
            let outcome = lifecycle.purge(session.as_deref()).await?;
            if let PurgeOutcome::Swept { warnings, .. } = &outcome {
                warn_all(warnings);
            }
            println!("{}", purge_message(&outcome));
        }
        Commands::Config { command } => execute_config(context, command).await?,
        Commands::Recover { session } => {
            let outcome = lifecycle.recover(&session).await?;
            warn_all(&outcome.warnings);
            println!("Recovered session '{}'", outcome.name);
        }
        Commands::Rename { old, new } => {
            let outcome = lifecycle.rename(&old, &new).await?;
            println!("Renamed session '{}' to '{}'", outcome.old, outcome.new);
        }
        Commands::Abort { session } => {
            let outcome = lifecycle.abort(session.as_deref()).await?;
            warn_all(&outcome.warnings);
            println!("{}", abort_message(&outcome));
        }
    }

    Ok(())
}

async fn execute_config(context: &SessionContext, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Get { key } => {
            let key: ConfigKey = key.parse()?;
            println!("{}", format_value(context.lifecycle.config().get(key)));
        }
        ConfigCommands::Set { key, value } => {
            let key: ConfigKey = key.parse()?;
            let value = parse_cli_value(&value)?;
            context.config_store.set(key, value).await?;
            println!("Set {key} = {}", format_value(value));
        }
    }
    Ok(())
}
