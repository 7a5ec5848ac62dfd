//! Config command - inspect configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use super::load_settings;
use crate::output::{JsonFormatter, PathsOutput};
use crate::settings::{Settings, default_config_dir};
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show effective configuration (credential redacted).
    Show,

    /// Show configuration paths.
    Path,
}

/// Effective settings as printed by `config show`.
#[derive(Debug, Serialize)]
struct EffectiveConfig {
    effective_base_url: String,
    #[serde(flatten)]
    settings: Settings,
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli),
        ConfigAction::Path => show_paths(cli),
    }
}

fn show_config(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli)?.redacted();

    match cli.format {
        OutputFormat::Text => {
            println!("UptimeKit Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Base URL:     {}", settings.effective_base_url());
            println!(
                "API key:      {}",
                settings.api_key.as_deref().unwrap_or("(not set)")
            );
            if let Some(secs) = settings.timeout_secs {
                println!("Timeout:      {secs}s");
            }
            if let Some(attempts) = settings.max_attempts {
                println!("Max attempts: {attempts}");
            }
            if let Some(ms) = settings.base_delay_ms {
                println!("Base delay:   {ms}ms");
            }
            if !settings.headers.is_empty() {
                println!();
                println!("Headers:");
                for (name, value) in &settings.headers {
                    println!("  {name}: {value}");
                }
            }
        }
        OutputFormat::Json => {
            let output = EffectiveConfig {
                effective_base_url: settings.effective_base_url().to_string(),
                settings,
            };
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = cli.settings_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
            if !settings_path.exists() {
                println!("               (not created)");
            }
        }
        OutputFormat::Json => {
            let paths = PathsOutput {
                config_dir: config_dir.display().to_string(),
                settings_file: settings_path.display().to_string(),
                settings_exists: settings_path.exists(),
            };
            println!("{}", JsonFormatter::new(cli.pretty).format(&paths)?);
        }
    }

    Ok(())
}
