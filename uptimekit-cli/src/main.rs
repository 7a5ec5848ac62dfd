// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! UptimeKit CLI - manage uptime monitoring resources from the command line.
//!
//! # Examples
//!
//! ```bash
//! # List monitors
//! uptimekit list monitor
//!
//! # Fetch one status page as JSON
//! uptimekit get status-page 42 --format json --pretty
//!
//! # Create a maintenance window from a file
//! uptimekit create maintenance-window --data @window.json
//!
//! # Delete and wait until the API stops serving it
//! uptimekit delete monitor 800123 --wait --timeout 120
//!
//! # Pause a monitor
//! uptimekit pause 800123
//! ```

mod commands;
mod output;
mod settings;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use uptimekit_client::ClientError;

use commands::{config, monitor, resource};

// ============================================================================
// CLI Definition
// ============================================================================

/// UptimeKit CLI - uptime monitoring resources.
#[derive(Parser)]
#[command(name = "uptimekit")]
#[command(about = "Manage uptime monitors, status pages, integrations and maintenance windows")]
#[command(long_about = r#"
UptimeKit manages resources of an uptime-monitoring REST API.

Resource kinds:
  • monitor             (/monitors)
  • status-page         (/psps)
  • integration         (/integrations)
  • maintenance-window  (/maintenance-windows)

Settings are read from settings.json in the config dir (see `config path`),
then UPTIMEKIT_API_KEY / UPTIMEKIT_BASE_URL, then flags.

Examples:
  uptimekit list monitor
  uptimekit get monitor 800123 --format json
  uptimekit delete monitor 800123 --wait
  uptimekit config show
"#)]
#[command(version)]
#[command(author = "UptimeKit Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// API key (overrides settings.json).
    #[arg(long, env = "UPTIMEKIT_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL (overrides settings.json).
    #[arg(long, env = "UPTIMEKIT_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Settings file to use instead of the default.
    #[arg(long, env = "UPTIMEKIT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Settings file in effect.
    pub fn settings_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(settings::default_settings_path)
    }
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one resource.
    #[command(visible_alias = "g")]
    Get(resource::GetArgs),

    /// List every resource of a kind.
    #[command(visible_alias = "ls")]
    List(resource::ListArgs),

    /// Create a resource from JSON.
    Create(resource::CreateArgs),

    /// Update fields of a resource from JSON.
    Update(resource::UpdateArgs),

    /// Delete a resource.
    #[command(visible_alias = "rm")]
    Delete(resource::DeleteArgs),

    /// Pause a monitor.
    Pause(monitor::MonitorArgs),

    /// Resume a paused monitor.
    Start(monitor::MonitorArgs),

    /// Inspect configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
    /// Resource not found.
    NotFound = 2,
    /// Deletion not confirmed in time.
    Timeout = 4,
    /// Interrupted by Ctrl+C.
    Interrupted = 130,
}

impl ExitCode {
    /// Maps a command error to an exit code.
    fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<ClientError>() {
            Some(ClientError::Cancelled { .. }) => Self::Interrupted,
            Some(ClientError::DeleteTimeout { .. }) => Self::Timeout,
            Some(ClientError::FallbackNotFound { .. }) => Self::NotFound,
            Some(e) if e.is_not_found() => Self::NotFound,
            _ => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("uptimekit=debug")
    } else {
        EnvFilter::new("uptimekit=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Returns a token cancelled on the first Ctrl+C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, cancelling");
            trigger.cancel();
        }
    });
    cancel
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Get(args) => resource::get(args, &cli).await,
        Commands::List(args) => resource::list(args, &cli).await,
        Commands::Create(args) => resource::create(args, &cli).await,
        Commands::Update(args) => resource::update(args, &cli).await,
        Commands::Delete(args) => {
            let cancel = if args.wait {
                cancel_on_ctrl_c()
            } else {
                CancellationToken::new()
            };
            resource::delete(args, &cli, &cancel).await
        }
        Commands::Pause(args) => monitor::pause(args, &cli).await,
        Commands::Start(args) => monitor::start(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::time::Duration;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_delete_with_wait() {
        let cli = Cli::try_parse_from([
            "uptimekit", "delete", "monitor", "7", "--wait", "--timeout", "5", "--format", "json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Delete(args) => {
                assert_eq!(args.id, "7");
                assert!(args.wait);
                assert_eq!(args.timeout, 5);
            }
            _ => panic!("expected delete"),
        }
    }

    #[test]
    fn test_timeout_requires_wait() {
        let parsed = Cli::try_parse_from(["uptimekit", "delete", "monitor", "7", "--timeout", "5"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(Cli::try_parse_from(["uptimekit", "list", "alerts"]).is_err());
    }

    #[test]
    fn test_exit_codes() {
        let not_found = anyhow::Error::new(ClientError::Status {
            status: 404,
            body: String::new(),
        });
        assert_eq!(ExitCode::for_error(&not_found), ExitCode::NotFound);

        let timeout = anyhow::Error::new(ClientError::DeleteTimeout {
            id: "7".to_string(),
            timeout: Duration::from_secs(1),
        });
        assert_eq!(ExitCode::for_error(&timeout), ExitCode::Timeout);

        let cancelled = anyhow::Error::new(ClientError::Cancelled { id: "7".to_string() });
        assert_eq!(ExitCode::for_error(&cancelled), ExitCode::Interrupted);

        let other = anyhow::anyhow!("settings unreadable");
        assert_eq!(ExitCode::for_error(&other), ExitCode::Error);
    }
}
