//! Wheelwright - reproducible cross-language build orchestrator
//!
//! CLI entry point that dispatches to subcommands.

use clap::{CommandFactory, Parser};
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wheelwright::cli::{Cli, Commands};
use wheelwright::config::ConfigManager;
use wheelwright::error::WwResult;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(stage) = e.stage() {
                eprintln!(
                    "{} {} stage failed: {}",
                    style("Error:").red().bold(),
                    stage,
                    e
                );
            } else {
                eprintln!("{} {}", style("Error:").red().bold(), e);
            }
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> WwResult<()> {
    let cli = Cli::parse();

    // Commands that need no configuration (or logging)
    match cli.command {
        Commands::Init(args) => return wheelwright::cli::commands::init(args).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    // Load configuration
    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    // Find local config unless --no-local is set
    let local_config_path = if cli.no_local {
        debug!("Local config discovery disabled (--no-local)");
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| wheelwright::error::WheelwrightError::io("getting current directory", e))?;
        let found = ConfigManager::find_local_config(&cwd);
        if let Some(ref path) = found {
            debug!("Found local config: {}", path.display());
        }
        found
    };

    let config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    // Verbosity: 0 = warn (spinners only), 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("wheelwright=warn"),
        1 => EnvFilter::new("wheelwright=info"),
        _ => EnvFilter::new("wheelwright=debug"),
    };
    if config.general.log_format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .init();
    }

    // Dispatch to command
    match cli.command {
        Commands::Init(_) | Commands::Completions { .. } => unreachable!("handled above"),
        Commands::Build(args) => wheelwright::cli::commands::build(args, &config).await,
        Commands::Install(args) => wheelwright::cli::commands::install(args, &config).await,
        Commands::Compose(args) => wheelwright::cli::commands::compose(args, &config).await,
        Commands::Cache(args) => wheelwright::cli::commands::cache(args, &config).await,
        Commands::Status => wheelwright::cli::commands::status(&config).await,
    }
}
