use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use lumen_codes::{Catalog, CodeIndex};
use lumen_engine::{EngineConfig, SessionManager};
use lumen_server::{AppState, ServerConfig};
use lumen_settings::LumenSettings;
use lumen_telemetry::TelemetryConfig;

#[derive(Debug, Parser)]
#[command(name = "lumen", version, about = "Session broadcast server")]
struct Cli {
    /// Settings file to use instead of ~/.lumen/settings.json.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on; overrides settings and LUMEN_PORT.
    #[arg(long, short)]
    port: Option<u16>,

    /// Healing code catalog; overrides settings and LUMEN_CODES_PATH.
    #[arg(long)]
    codes: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => lumen_settings::load_settings_from_path(path),
        None => lumen_settings::load_settings(),
    }
    .context("failed to load settings")?;
    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    if let Some(codes) = cli.codes {
        settings.codes.catalog_path = codes;
    }

    let telemetry = TelemetryConfig {
        json: settings.logging.json,
        ..TelemetryConfig::default()
    }
    .with_level_str(&settings.logging.level);
    let _ = lumen_telemetry::init_telemetry(&telemetry);

    tracing::info!("starting lumen server");

    let codes = Arc::new(load_index(&settings));
    let manager = Arc::new(SessionManager::new(EngineConfig::from(&settings.engine)));

    let config = ServerConfig {
        host: settings.server.host.clone(),
        port: settings.server.port,
        request_timeout_secs: settings.server.request_timeout_secs,
    };
    let state = AppState {
        manager: Arc::clone(&manager),
        codes,
    };
    let handle = lumen_server::start(config, state)
        .await
        .context("failed to start server")?;

    tracing::info!(port = handle.port, "lumen server ready");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl+c")?;

    tracing::info!("shutting down");
    handle.abort();
    let stopped = manager.stop_all();
    // let workers observe the stop and log their exit
    if stopped > 0 {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    Ok(())
}

/// A missing or unreadable catalog is not fatal: the server runs with an
/// empty index and code lookups find nothing.
fn load_index(settings: &LumenSettings) -> CodeIndex {
    let catalog = Catalog::load(&settings.codes.catalog_path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "healing code catalog unavailable, lookups disabled");
        Catalog::default()
    });
    let index = CodeIndex::new(catalog, settings.codes.fuzzy_threshold);
    tracing::debug!(keywords = index.keyword_count(), "code index built");
    index
}
