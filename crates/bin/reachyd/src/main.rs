//! # reachyd: Reachy Mini integration host
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`reachy.toml`, env vars)
//! - Install the `tracing` subscriber
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the simulated integration and the entry service
//! - Re-activate stored config entries
//! - Build the axum router, bind and serve until SIGINT/SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;
mod shutdown;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use reachy_mini_adapter_http_axum::state::AppState;
use reachy_mini_adapter_simulated::SimulatedIntegration;
use reachy_mini_adapter_storage_sqlite_sqlx::{Config as DatabaseConfig, SqliteConfigEntryRepository};
use reachy_mini_app::event_bus::InProcessEventBus;
use reachy_mini_app::services::entry_service::EntryService;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = DatabaseConfig {
        database_url: config.database.url.clone(),
    }
    .build()
    .await?;
    let repo = SqliteConfigEntryRepository::new(db.pool().clone());

    // Services
    let event_bus = InProcessEventBus::new(config.server.event_capacity);
    let integration = SimulatedIntegration::new(config.simulated.clone());
    let entry_service = Arc::new(EntryService::new(repo, integration, event_bus.clone()));

    let restored = entry_service.restore_entries().await?;
    tracing::info!(restored, "config entries restored");

    // HTTP
    let state = AppState::from_arc(entry_service, event_bus);
    let app = reachy_mini_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "reachyd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::signal())
        .await?;

    tracing::info!("reachyd stopped");
    Ok(())
}
