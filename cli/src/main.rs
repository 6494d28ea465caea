//! Marketplace admin CLI

mod commands;
mod config;
mod logging;
mod render;
mod transport;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::{App, Commands};
use marketplace_core::{MarketplaceClient, Platform};
use tracing::{error, info, Level};
use transport::Transport;

/// Shown for every failed command; the cause goes to the log.
const FAILURE_NOTICE: &str = "Request failed. Check your credentials or the connection.";

#[derive(Parser)]
#[command(name = "marketplace")]
#[command(about = "Admin client for the marketplace API")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Configuration file (defaults to ./marketplace.toml when present)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Runtime target used to pick the default API address
    #[arg(long, global = true)]
    platform: Option<Platform>,

    /// API base URL, overriding the platform default
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory holding the cached credentials
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(short = 't', long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn overrides(&self) -> config::Overrides {
        config::Overrides {
            platform: self.platform,
            base_url: self.base_url.clone(),
            storage_dir: self.storage_dir.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.clone().into());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("command failed: {e:#}");
            eprintln!("{FAILURE_NOTICE}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = config::load(cli.config.as_deref(), &cli.overrides())?;
    info!(base_url = %settings.resolved_base_url(), platform = %settings.platform, "loaded configuration");

    let session = Arc::new(config::session_store(&settings));
    session.load_session();
    let app = App {
        client: MarketplaceClient::from_config(&settings, session),
        transport: Transport::new(settings.timeout()),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli.command.execute(&app, &mut out)?;
    out.flush()?;
    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
