use clap::{ArgAction, Parser, Subcommand};
use commands::{config, sync};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "arrsheets")]
#[command(about = "Keep Radarr and Sonarr in step with a Google Sheets watch list")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Configuration file (defaults to $ARRSHEETS_CONFIG, then the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also write logs to this file, rotated daily (in the container: $ARRSHEETS_BASE_PATH/logs/arrsheets.log)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the watch list with Radarr and Sonarr, then write results back
    #[command(long_about = "Read every TMDb URL from the configured sheet range, add missing titles to Radarr or Sonarr, and write a status and release date next to each row.")]
    Sync {
        /// Query everything but add nothing and leave the sheet untouched
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks sensitive data)
    #[command(long_about = "Display the current configuration. API keys are masked unless --full is given.")]
    Show {
        /// Show API keys unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Check the configuration file for missing or placeholder values
    Validate,

    /// Write a configuration template
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = cli.log_file.clone().or_else(arr_sync_config::default_log_file);
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let config_path = arr_sync_config::resolve_config_path(cli.config.as_deref());

    match cli.command {
        Commands::Sync { dry_run } => sync::run_sync(&config_path, dry_run, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &config_path, &output),
    }
}
