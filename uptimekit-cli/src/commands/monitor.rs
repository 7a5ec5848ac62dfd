//! Monitor actions: pause and start.

use anyhow::Result;
use clap::Args;
use tracing::info;
use uptimekit_core::Monitor;

use super::build_client;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for pause and start.
#[derive(Args)]
pub struct MonitorArgs {
    /// Monitor identifier.
    pub id: String,
}

/// Stops checking a monitor.
pub async fn pause(args: &MonitorArgs, cli: &Cli) -> Result<()> {
    let monitor = build_client(cli)?.monitors().pause(&args.id).await?;
    info!(id = %args.id, "Monitor paused");
    print_monitor(cli, &monitor)
}

/// Resumes checking a monitor.
pub async fn start(args: &MonitorArgs, cli: &Cli) -> Result<()> {
    let monitor = build_client(cli)?.monitors().start(&args.id).await?;
    info!(id = %args.id, "Monitor started");
    print_monitor(cli, &monitor)
}

fn print_monitor(cli: &Cli, monitor: &Monitor) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            println!("{}", TextFormatter::new(!cli.no_color).format_monitor(monitor));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(monitor)?);
        }
    }
    Ok(())
}
