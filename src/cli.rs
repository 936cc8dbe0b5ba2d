use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use crate::app::TraceRunner;
use crate::config::ProgressBarConfig;

/// linear-progress - indeterminate linear progress indicator for the terminal
#[derive(Parser, Debug)]
#[command(name = "linear-progress")]
#[command(about = "An indeterminate linear progress indicator for terminal user interfaces")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Maximum log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value_t = tracing::Level::INFO)]
    pub log_level: tracing::Level,

    /// Shorthand for --log-level debug
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Override the bar height
    #[arg(long, global = true)]
    pub bar_height: Option<f64>,

    /// Override the bar width (0 follows the container)
    #[arg(long, global = true)]
    pub bar_width: Option<f64>,

    /// Override the grow/shrink duration in seconds
    #[arg(long, global = true)]
    pub grow_duration: Option<f64>,

    /// Override the sweep duration in seconds
    #[arg(long, global = true)]
    pub sweep_duration: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive terminal demo (default)
    Demo,

    /// Drive the indicator without a terminal and print its geometry per tick
    Trace(TraceArgs),

    /// Show or initialise configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TraceArgs {
    /// Number of ticks to run
    #[arg(long, default_value_t = 120)]
    pub steps: u32,

    /// Milliseconds per tick
    #[arg(long, default_value_t = 50)]
    pub step_ms: u64,

    /// Container width the indicator attaches to
    #[arg(long, default_value_t = 80.0)]
    pub width: f64,

    /// Container height the indicator attaches to
    #[arg(long, default_value_t = 24.0)]
    pub height: f64,

    /// Request a stop at this tick
    #[arg(long)]
    pub stop_at: Option<u32>,

    /// Request a stop after the current sweep at this tick
    #[arg(long)]
    pub stop_after_completion_at: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration (default)
    Show,

    /// Write the default configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show configuration file location
    Path,
}

impl Cli {
    /// Effective maximum log level
    pub fn log_level(&self) -> tracing::Level {
        if self.debug {
            tracing::Level::DEBUG
        } else {
            self.log_level
        }
    }

    /// Resolve the config file path from the flag or the platform default
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => ProgressBarConfig::default_path()
                .ok_or_else(|| anyhow!("Cannot find config directory")),
        }
    }

    /// Load the config file and apply command-line overrides
    pub async fn load_config(&self) -> Result<ProgressBarConfig> {
        let path = self.config_path()?;
        let mut config = ProgressBarConfig::load_from_file(&path).await?;
        self.apply_overrides(&mut config)?;
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut ProgressBarConfig) -> Result<()> {
        if let Some(height) = self.bar_height {
            config.bar_height = height;
        }
        if let Some(width) = self.bar_width {
            config.bar_width = width;
        }
        if let Some(secs) = self.grow_duration {
            config.grow_duration = Duration::try_from_secs_f64(secs)
                .map_err(|e| anyhow!("Invalid grow duration {}: {}", secs, e))?;
        }
        if let Some(secs) = self.sweep_duration {
            config.sweep_duration = Duration::try_from_secs_f64(secs)
                .map_err(|e| anyhow!("Invalid sweep duration {}: {}", secs, e))?;
        }
        config.validate()?;
        Ok(())
    }
}

/// Executes non-interactive commands.
///
/// The config file is only read by commands that use it, so `config init`
/// can replace a file that no longer parses.
pub struct CliHandler {
    cli: Cli,
}

impl CliHandler {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Handle CLI commands. `Demo` is handled by the caller.
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Demo => Ok(()),
            Commands::Trace(args) => self.handle_trace(args).await,
            Commands::Config(args) => self.handle_config(args).await,
        }
    }

    async fn handle_trace(&self, args: TraceArgs) -> Result<()> {
        let config = self.cli.load_config().await?;
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let mut runner = TraceRunner::new(config, args);
        runner.run(&mut out)?;
        out.flush()?;
        Ok(())
    }

    async fn handle_config(&self, args: ConfigArgs) -> Result<()> {
        let config_path = self.cli.config_path()?;

        match args.command.unwrap_or(ConfigCommands::Show) {
            ConfigCommands::Show => {
                let config = self.cli.load_config().await?;
                print!("{}", config.to_toml()?);
            }
            ConfigCommands::Init { force } => {
                if config_path.exists() && !force {
                    return Err(anyhow!(
                        "{} already exists (use --force to overwrite)",
                        config_path.display()
                    ));
                }
                ProgressBarConfig::default().save_to_file(&config_path).await?;
                tracing::info!("Initialised config at {}", config_path.display());
                println!("Wrote default configuration to {}", config_path.display());
            }
            ConfigCommands::Path => {
                println!("Config file: {}", config_path.display());
            }
        }

        Ok(())
    }
}
