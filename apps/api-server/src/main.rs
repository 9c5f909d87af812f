//! # Scribe API Server
//!
//! The main entry point for the Actix-web HTTP server.

use anyhow::Context;

use api_server::AppConfig;
use api_server::telemetry::init_telemetry;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env();

    init_telemetry(&config.telemetry);

    tracing::info!(
        "Starting Scribe API Server on {}:{}",
        config.host,
        config.port
    );

    let server = api_server::run_server(&config)
        .await
        .context("server failed to start")?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    tracing::info!("Shutdown signal received");
    server.close().await.context("server failed to stop cleanly")?;

    Ok(())
}
