// EPT leaders entry point.
//
// Startup sequence:
// 1. Initialize tracing
// 2. Load config (copying defaults on first run)
// 3. Build the stats provider client
// 4. Bind the listener
// 5. Serve until Ctrl+C

use std::sync::Arc;

use anyhow::Context;
use ept_server::config;
use ept_server::http_server::{self, AppState};
use ept_server::upstream::NbaStatsClient;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("EPT leaders starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: bind={}, static_dir={}, upstream={}",
        config.bind_addr(),
        config.server.static_dir.display(),
        config.upstream.url
    );
    if !config.server.static_dir.is_dir() {
        warn!(
            "static directory {} does not exist; only the stats endpoint will answer",
            config.server.static_dir.display()
        );
    }

    // 3. Build the stats provider client
    let client = NbaStatsClient::from_config(&config.upstream)
        .context("failed to build stats provider client")?;
    let state = AppState::new(Arc::new(client), config.server.static_dir.clone());

    // 4. Bind the listener
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    // 5. Serve until Ctrl+C
    http_server::run(listener, state, shutdown_signal()).await?;

    info!("EPT leaders shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

/// Initialize tracing to stderr with an env-overridable filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ept_server=info,ept_leaders=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
