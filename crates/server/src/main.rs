mod app;
mod bootstrap;
mod health;
mod webhook;

use anyhow::Result;
use orderdesk_core::config::{AppConfig, LoadOptions};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(config: &AppConfig) {
    use orderdesk_core::config::LogFormat::*;

    // RUST_LOG wins over the configured level when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));
    let builder = tracing_subscriber::fmt().with_target(false).with_env_filter(filter);

    match config.logging.format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;
    let bind_address = app.config.server.bind_address.clone();
    let port = app.config.server.port;
    let listener = TcpListener::bind((bind_address.as_str(), port)).await?;

    info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %bind_address,
        port,
        "orderdesk-server listening"
    );

    axum::serve(listener, app::router(app.state))
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;

    info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "orderdesk-server stopped"
    );
    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(
            event_name = "system.server.signal_error",
            correlation_id = "shutdown",
            error = %error,
            "could not listen for ctrl-c; running until killed"
        );
        std::future::pending::<()>().await;
    }

    info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "shutdown requested, draining in-flight requests"
    );
}
