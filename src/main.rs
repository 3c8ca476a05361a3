use clap::{CommandFactory, Parser};
use std::sync::Arc;

use kaishaku::app::{handle_fatal_error, initialize_app, AppConfig, SessionContext};
use kaishaku::cli::{execute_command, Cli};
use kaishaku::interaction::StdinPrompter;
use kaishaku::subprocess::SubprocessManager;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    if let Err(e) = run(cli).await {
        handle_fatal_error(e, verbose);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::new(cli.verbose)?;
    initialize_app(&config);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let context = SessionContext::build(
        &config,
        &SubprocessManager::production(),
        Arc::new(StdinPrompter::new()),
    )
    .await?;

    execute_command(&context, command).await
}
