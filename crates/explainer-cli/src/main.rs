mod commands;

use clap::Parser;
use commands::Commands;
use explainer_core::{ConfigManager, LoggingConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ctx-explain", version)]
#[command(about = "Context Explainer - explain, improve and bug-check code snippets")]
struct Cli {
    /// Settings file to use instead of the discovered one
    #[arg(long, global = true, env = "EXPLAINER_CONFIG")]
    config: Option<PathBuf>,

    /// API key for this invocation only
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let manager = match &cli.config {
        Some(path) => ConfigManager::from_file(path).await?,
        None => ConfigManager::auto_discover().await?,
    };

    init_logging(cli.verbose, &manager.get_config().await.logging);
    log_config_origin(ConfigOrigin::of(manager.config_path()), cli.config.is_some());

    if let Some(key) = cli.api_key {
        manager.set_credential_override(Some(key)).await;
    }

    commands::run(cli.command, manager).await
}

/// Logs go to stderr, stdout carries the command output
fn init_logging(verbose: bool, logging: &LoggingConfig) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
    };

    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    if logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Where the effective settings came from
#[derive(Debug, PartialEq)]
enum ConfigOrigin<'a> {
    File(&'a Path),
    Missing(&'a Path),
    Defaults,
}

impl<'a> ConfigOrigin<'a> {
    fn of(path: Option<&'a Path>) -> Self {
        match path {
            Some(path) if path.exists() => ConfigOrigin::File(path),
            Some(path) => ConfigOrigin::Missing(path),
            None => ConfigOrigin::Defaults,
        }
    }
}

/// Settings are loaded before the subscriber exists, so report them afterwards
fn log_config_origin(origin: ConfigOrigin<'_>, explicit: bool) {
    match origin {
        ConfigOrigin::File(path) => debug!("Loaded configuration from {}", path.display()),
        ConfigOrigin::Missing(path) if explicit => warn!(
            "Configuration file {} not found, using defaults",
            path.display()
        ),
        ConfigOrigin::Missing(path) => debug!(
            "No configuration file yet, using defaults; changes are saved to {}",
            path.display()
        ),
        ConfigOrigin::Defaults => debug!("No configuration file location, using defaults"),
    }
}
