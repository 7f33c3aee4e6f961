//! # npmapi
//!
//! Command-line client for the npm registry, the downloads API and npms.io.
//!
//! This is the main entry point. It handles command parsing, sets up logging
//! and error handling, and dispatches to the appropriate command handlers.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use npmapi_core::error::{NpmError, NpmResult};
use std::collections::HashMap;
use std::process::ExitCode;
use tracing::{debug, error};

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Query the npm registry, download counts and package scores
#[derive(Parser)]
#[command(name = "npmapi", version, about = "Query the npm registry, download counts and package scores")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Per-request timeout in seconds (0 disables it)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Registry base URL
    #[arg(long, global = true, value_name = "URL")]
    pub registry: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every published package, streaming the bulk listing
    All {
        /// Fail when fewer packages are listed
        #[arg(long, value_name = "N")]
        min_count: Option<usize>,
        /// Print only the number of packages
        #[arg(long)]
        count: bool,
    },
    /// Show a package summary
    Info {
        name: String,
    },
    /// Show a registry user
    User {
        name: String,
    },
    /// Daily downloads between two days (YYYY-MM-DD, inclusive)
    Downloads {
        name: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Downloads today (UTC)
    Today {
        name: String,
    },
    /// Downloads yesterday (UTC)
    Yesterday {
        name: String,
    },
    /// Packages updated today
    Updates,
    /// Number of dependents per package
    Depended {
        /// Show only the N most depended-upon packages
        #[arg(long, value_name = "N")]
        top: Option<usize>,
    },
    /// npms.io score of a package
    Score {
        name: String,
    },
}

impl Cli {
    /// Overrides passed on to the configuration layering
    pub fn config_overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(timeout) = self.timeout {
            overrides.insert("timeout".to_string(), timeout.to_string());
        }
        if let Some(registry) = &self.registry {
            overrides.insert("registry".to_string(), registry.clone());
        }
        overrides
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    debug!("Starting npmapi v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli) -> NpmResult<()> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| NpmError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new(&cli.config_overrides()).await?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "npmapi={level},npmapi_registry={level},npmapi_config={level}"
        ))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("npmapi encountered an unexpected error: {}", panic_info);
        eprintln!("npmapi crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/npmapi/npmapi/issues");
        eprintln!("Error: {}", panic_info);
    }));
}
