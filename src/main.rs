//! Pomofocus - a headless Pomodoro timer
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after every 4 pomodoros

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::warn;

use pomofocus::cli::{Cli, Commands, Display, IpcClient, SettingsAction};
use pomofocus::daemon::{self, DaemonOptions};
use pomofocus::settings::{self, AppPaths};
use pomofocus::types::TaskId;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        // No command provided, show help
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Start => Display::show_command_result(&IpcClient::new()?.start().await?),
        Commands::Pause => Display::show_command_result(&IpcClient::new()?.pause().await?),
        Commands::Toggle => Display::show_command_result(&IpcClient::new()?.toggle().await?),
        Commands::Reset => Display::show_command_result(&IpcClient::new()?.reset().await?),
        Commands::Mode { mode } => {
            let response = IpcClient::new()?.mode(mode.into()).await?;
            Display::show_command_result(&response);
        }
        Commands::Task { id } => {
            let response = IpcClient::new()?.task(id.map(TaskId::from)).await?;
            Display::show_command_result(&response);
        }
        Commands::Status => Display::show_status(&IpcClient::new()?.status().await?),
        Commands::Reload => Display::show_command_result(&IpcClient::new()?.reload().await?),
        Commands::Clear => Display::show_command_result(&IpcClient::new()?.clear().await?),
        Commands::Daemon { interactive } => {
            let paths = AppPaths::from_home()?;
            daemon::run_daemon(DaemonOptions { paths, interactive }).await?;
        }
        Commands::History { limit } => {
            let paths = AppPaths::from_home()?;
            let records = daemon::load_history(&paths.sessions(), limit)
                .await
                .context("Failed to read session history")?;
            let progress = match daemon::load_task_progress(&paths.task_progress()).await {
                Ok(progress) => progress,
                Err(e) => {
                    warn!("Failed to read task progress: {}", e);
                    BTreeMap::new()
                }
            };
            Display::show_history(&records, &progress);
        }
        Commands::Settings { action } => run_settings(action)?,
        Commands::Completions { shell } => generate_completions(shell),
    }

    Ok(())
}

/// Handles `settings show|path|set`.
fn run_settings(action: SettingsAction) -> Result<()> {
    let path = AppPaths::from_home()?.settings();
    match action {
        SettingsAction::Path => println!("{}", path.display()),
        SettingsAction::Show => Display::show_settings(&settings::load(&path)?),
        SettingsAction::Set(args) => {
            if args.is_empty() {
                anyhow::bail!("Nothing to change; see 'pomofocus settings set --help'");
            }
            let config = args.apply(settings::load(&path)?);
            settings::save(&path, &config)?;
            Display::show_settings(&config);
            println!("\nRun 'pomofocus reload' to apply the changes to a running daemon");
        }
    }
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
