//! Command implementations and dispatch logic.
//!
//! Every handler is an async function that takes a CommandContext holding the
//! configured registry client and the output handler.

use camino::Utf8PathBuf;
use npmapi_config::{ApiToml, ConfigLayering, ConfigLoader};
use npmapi_core::error::{NpmError, NpmResult};
use npmapi_registry::{ClientConfig, RegistryClient, RetryConfig};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

pub mod downloads;
pub mod listing;
pub mod package;

#[cfg(test)]
mod tests;

use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub client: RegistryClient,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Load the layered configuration and build the registry client
    pub async fn new(cli_overrides: &HashMap<String, String>) -> NpmResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| NpmError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|path| NpmError::ConfigValidation {
            field: "cwd".to_string(),
            reason: format!("{} is not valid UTF-8", path.display()),
        })?;

        let loader = ConfigLoader::new(cwd);
        let (config, source) = loader
            .load(&ConfigLayering::env_overrides(), cli_overrides)
            .await?;
        debug!("Configuration loaded from {:?}", source);

        let client = RegistryClient::with_config(client_config(&config))?;

        Ok(Self {
            client,
            output: OutputHandler::new(),
        })
    }
}

/// Translate the file configuration into client settings
pub fn client_config(config: &ApiToml) -> ClientConfig {
    let defaults = ClientConfig::default();

    ClientConfig {
        registry_url: config.registry.url.trim_end_matches('/').to_string(),
        downloads_url: config.registry.downloads_url.trim_end_matches('/').to_string(),
        score_url: config.registry.score_url.trim_end_matches('/').to_string(),
        timeout: config.http.timeout(),
        user_agent: config.http.user_agent.clone().unwrap_or(defaults.user_agent),
        listing_buffer: config.http.listing_buffer,
        retry: RetryConfig {
            max_retries: config.retry.max_retries,
            initial_delay: Duration::from_millis(config.retry.initial_delay_ms),
            max_delay: Duration::from_millis(config.retry.max_delay_ms),
            multiplier: config.retry.multiplier,
        },
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> NpmResult<()> {
    match command {
        Commands::All { min_count, count } => {
            info!("Listing all packages (min_count: {:?})", min_count);
            listing::all(min_count, count, ctx).await
        }
        Commands::Info { name } => {
            info!("Fetching package: {}", name);
            package::info(&name, ctx).await
        }
        Commands::User { name } => {
            info!("Fetching user: {}", name);
            package::user(&name, ctx).await
        }
        Commands::Downloads { name, start, end } => {
            info!("Fetching downloads of {} from {} to {}", name, start, end);
            downloads::range(&name, start, end, ctx).await
        }
        Commands::Today { name } => {
            info!("Fetching today's downloads of {}", name);
            downloads::today(&name, ctx).await
        }
        Commands::Yesterday { name } => {
            info!("Fetching yesterday's downloads of {}", name);
            downloads::yesterday(&name, ctx).await
        }
        Commands::Updates => {
            info!("Fetching today's updates");
            listing::updates(ctx).await
        }
        Commands::Depended { top } => {
            info!("Fetching dependent counts (top: {:?})", top);
            listing::depended(top, ctx).await
        }
        Commands::Score { name } => {
            info!("Fetching score of {}", name);
            package::score(&name, ctx).await
        }
    }
}
