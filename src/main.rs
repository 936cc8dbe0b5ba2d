use anyhow::Result;
use clap::Parser;
use linear_progress::app::App;
use linear_progress::cli::{Cli, CliHandler, Commands};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Write logs to a file so they do not interfere with the TUI
    let log_path = cli
        .log_file
        .clone()
        .or_else(default_log_path)
        .unwrap_or_else(|| PathBuf::from("linear-progress.log"));
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", log_path.display(), e))?;

    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .with_max_level(cli.log_level())
        .init();

    match cli.command.take() {
        None | Some(Commands::Demo) => {
            let config = cli.load_config().await?;
            tracing::info!("Starting demo");
            App::new(config).run().await
        }
        Some(command) => CliHandler::new(cli).handle_command(command).await,
    }
}

fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("linear-progress").join("linear-progress.log"))
}
