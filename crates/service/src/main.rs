//! `folio-svc`: binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (OTEL + tracing).
//! 3. Resolve the encryption key and self-test the address vault.
//! 4. Open the record store.
//! 5. Build the Axum router and start the HTTP server.

mod config;
mod error;
mod portfolios;
mod server;
mod store;
mod telemetry;
mod users;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use vault::AddressVault;

use config::{Config, KeySource};
use server::state::AppState;
use store::MemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        wallet_header = %cfg.wallet_header_name,
        "folio-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. Address vault
    // -----------------------------------------------------------------------
    let (key, source) = cfg.symmetric_key()?;
    if source == KeySource::DevFallback {
        warn!("ENCRYPTION_KEY unset; sealing addresses with the public development key");
    }
    let vault = AddressVault::new(&key).context("failed to initialise address vault")?;
    drop(key);
    vault
        .self_test()
        .context("address vault self-test failed")?;
    info!("address vault ready");

    // -----------------------------------------------------------------------
    // 4. Record store
    // -----------------------------------------------------------------------
    let store = Arc::new(MemoryStore::new());

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(vault, store, cfg.wallet_header_name.clone());
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
