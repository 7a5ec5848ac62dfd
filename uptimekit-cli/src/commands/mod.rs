//! CLI command implementations.

pub mod config;
pub mod monitor;
pub mod resource;

use anyhow::Result;
use uptimekit_client::ApiClient;

use crate::Cli;
use crate::settings::Settings;

/// Resolves layered settings for this invocation.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let settings = Settings::load_from(&cli.settings_path())?;
    Ok(settings.with_overrides(cli.api_key.as_deref(), cli.base_url.as_deref()))
}

/// Builds an API client from layered settings.
pub fn build_client(cli: &Cli) -> Result<ApiClient> {
    let config = load_settings(cli)?.to_client_config()?;
    Ok(ApiClient::new(config)?)
}
