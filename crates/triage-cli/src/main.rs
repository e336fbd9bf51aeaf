//! Triage CLI - Multimodal triage intake from the command line.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use triage_cli::commands;
use triage_cli::repl;
use triage_cli::{Cli, Command, Config, Formatter};

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays clean for results
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> triage_cli::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_init(&Config::path()?)?,
    };

    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Some(Command::Profile(args)) => {
            commands::execute_profile(args, &mut config, &formatter)?;
        }
        Some(Command::Health) => {
            let service = config.service_config(cli.base_url, cli.api_key)?;
            commands::execute_health(service, &formatter).await?;
        }
        Some(Command::Run(args)) => {
            let service = config.service_config(cli.base_url, cli.api_key)?;
            commands::execute_run(args, service, &formatter).await?;
        }
        None | Some(Command::Session) => {
            let service = config.service_config(cli.base_url, cli.api_key)?;
            let orchestrator = commands::connect(service)?;
            repl::run_session(&orchestrator, &formatter, config.settings.history_size).await?;
        }
    }

    Ok(())
}
