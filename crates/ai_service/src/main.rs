//! Entry point for the AgroDx prediction service

use agrodx_ai_service::{start_server, BackendMode, ServiceConfig, ServiceContext};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "agrodx-ai-service")]
#[command(about = "AgroDx plant disease prediction service")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory with model.json, label_encoder.json and feature_columns.json
    #[arg(long)]
    artifacts_dir: Option<PathBuf>,

    /// Prediction backend
    #[arg(long, value_enum)]
    mode: Option<BackendMode>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    info!("Starting AgroDx AI Service v{}", env!("CARGO_PKG_VERSION"));

    let mut config = ServiceConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(dir) = cli.artifacts_dir {
        config.artifacts_dir = dir;
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }

    info!("Backend mode: {}", config.mode);
    let context = ServiceContext::from_config(&config);
    if !context.is_ready() {
        warn!("Serving in degraded mode: every prediction request will be refused");
    }

    start_server(context, &config.bind_addr()).await?;

    info!("AI Service stopped gracefully");
    Ok(())
}

/// Initialize logging from `RUST_LOG`, defaulting to info
fn init_logging() {
    let env = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(env)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
