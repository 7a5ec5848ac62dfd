//! Generic resource commands: get, list, create, update, delete.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uptimekit_core::{Record, ResourceKind};

use super::build_client;
use crate::output::{DeleteOutput, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Parses a resource kind name or alias.
fn parse_kind(s: &str) -> Result<ResourceKind, String> {
    s.parse().map_err(|e: uptimekit_core::CoreError| {
        let known: Vec<&str> = ResourceKind::all().iter().map(ResourceKind::cli_name).collect();
        format!("{e}. Known kinds: {}", known.join(", "))
    })
}

/// Reads a JSON body given inline or as `@path`.
fn parse_data(raw: &str) -> Result<Value> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?,
        None => raw.to_string(),
    };
    serde_json::from_str(&text).context("--data is not valid JSON")
}

// ============================================================================
// Arguments
// ============================================================================

/// Arguments for the get command.
#[derive(Args)]
pub struct GetArgs {
    /// Resource kind (monitor, status-page, integration, maintenance-window).
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    /// Resource identifier.
    pub id: String,
}

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Resource kind.
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,
}

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Resource kind.
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    /// JSON body, inline or `@file.json`.
    #[arg(long, short)]
    pub data: String,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Resource kind.
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    /// Resource identifier.
    pub id: String,

    /// JSON body with the fields to change, inline or `@file.json`.
    #[arg(long, short)]
    pub data: String,
}

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    /// Resource kind.
    #[arg(value_parser = parse_kind)]
    pub kind: ResourceKind,

    /// Resource identifier.
    pub id: String,

    /// Wait until the resource is no longer served.
    #[arg(long, short)]
    pub wait: bool,

    /// Seconds to wait for deletion to be confirmed.
    #[arg(long, default_value = "60", requires = "wait")]
    pub timeout: u64,
}

// ============================================================================
// Commands
// ============================================================================

/// Runs the get command. Falls back to the list endpoint on a 5xx.
pub async fn get(args: &GetArgs, cli: &Cli) -> Result<()> {
    let client = build_client(cli)?;
    let record = client.records(args.kind).get_with_fallback(&args.id).await?;
    print_record(cli, args.kind, &record)
}

/// Runs the list command.
pub async fn list(args: &ListArgs, cli: &Cli) -> Result<()> {
    let client = build_client(cli)?;
    let records = client.records(args.kind).list().await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_record_list(args.kind, &records));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&records)?);
        }
    }
    Ok(())
}

/// Runs the create command.
pub async fn create(args: &CreateArgs, cli: &Cli) -> Result<()> {
    let body = parse_data(&args.data)?;
    let client = build_client(cli)?;
    let record = client.records(args.kind).create(&body).await?;

    info!(kind = %args.kind, id = %record.id, "Created resource");
    print_record(cli, args.kind, &record)
}

/// Runs the update command.
pub async fn update(args: &UpdateArgs, cli: &Cli) -> Result<()> {
    let body = parse_data(&args.data)?;
    let client = build_client(cli)?;
    let record = client.records(args.kind).update(&args.id, &body).await?;
    print_record(cli, args.kind, &record)
}

/// Runs the delete command.
pub async fn delete(args: &DeleteArgs, cli: &Cli, cancel: &CancellationToken) -> Result<()> {
    let client = build_client(cli)?;
    let records = client.records(args.kind);

    if args.wait {
        records
            .delete_and_wait(&args.id, Duration::from_secs(args.timeout), cancel)
            .await?;
    } else {
        records.delete(&args.id).await?;
    }

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_deleted(args.kind, &args.id, args.wait));
        }
        OutputFormat::Json => {
            let output = DeleteOutput {
                kind: args.kind.cli_name().to_string(),
                id: args.id.clone(),
                deleted: true,
                confirmed: args.wait,
            };
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }
    Ok(())
}

fn print_record(cli: &Cli, kind: ResourceKind, record: &Record) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_record(kind, record));
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(record)?);
        }
    }
    Ok(())
}
