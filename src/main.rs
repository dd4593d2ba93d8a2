//! ==============================================================================
//! main.rs - sensor mock api entry point
//! ==============================================================================
//!
//! purpose:
//!     a stand-in for a real warehouse sensor api. front-end and integration
//!     work can poll it without hardware: every request returns a fresh,
//!     slowly drifting reading for each of the five warehouse sensors.
//!
//! responsibilities:
//!     - load configuration (file + cli overrides)
//!     - initialize logging
//!     - build the state store from the fixed roster (fail fast on bad baselines)
//!     - serve GET /latest-readings until ctrl+c
//!
//! relationships:
//!     - uses: config.rs (runtime settings)
//!     - uses: store.rs, domain.rs (initial sensor state)
//!     - uses: server.rs (http api, shared simulation)
//!
//! architecture:
//!
//!     ┌─────────────────────────────────────────────────────────────┐
//!     │                     mock api (this file)                    │
//!     │  ┌─────────────┐        ┌──────────────────────────────┐    │
//!     │  │ web server  │ -----> │ simulation (Arc<Mutex<..>>)  │    │
//!     │  │ (port 5000) │        │   state store + seeded rng   │    │
//!     │  └─────────────┘        └──────────────┬───────────────┘    │
//!     │                                        │ one pass/request   │
//!     │                                 ┌──────┴──────┐             │
//!     │                                 │  generator  │             │
//!     │                                 └─────────────┘             │
//!     └─────────────────────────────────────────────────────────────┘
//!
//! ==============================================================================

mod config;
mod domain;
mod generator;
mod server;
mod store;

use anyhow::{Context, Result};
use clap::Parser;
use std::str::FromStr;
use tokio::net::TcpListener;
use tracing::Level;

use domain::{BASELINE_HUMIDITIES, BASELINE_TEMPERATURES, ROSTER};
use store::StateStore;

#[tokio::main]
async fn main() -> Result<()> {
    // startup banner
    println!("===========================================================");
    println!("  Warehouse Sensor Mock API");
    println!("===========================================================");

    // step 1: load configuration
    let cli = config::Cli::parse();
    let config = config::MockConfig::resolve(&cli)?;
    config.print_summary();

    // step 2: logging
    let level = Level::from_str(&config.logging.level).unwrap_or_else(|_| {
        println!(
            "[CONFIG] Warning: unknown log level '{}' - using info",
            config.logging.level
        );
        Level::INFO
    });
    tracing_subscriber::fmt().with_max_level(level).init();

    // step 3: initialize sensor state
    println!("\n[STARTUP] Initializing state store...");
    let store = StateStore::with_roster(&ROSTER, BASELINE_TEMPERATURES, BASELINE_HUMIDITIES)
        .context("Invalid sensor roster")?;
    println!("[STARTUP] ✓ State store ready ({} sensors)", store.len());

    let simulation = server::Simulation::new(
        &ROSTER,
        store,
        config.simulation.seed,
        config.logging.show_sensor_data,
    );

    // step 4: serve
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!("[STARTUP] Starting mock API server...");
    println!("[STARTUP] ✓ Access data at: http://{}/latest-readings", addr);
    println!("[STARTUP] Press Ctrl+C to stop the server.");
    println!("────────────────────────────────────────────────────────────");

    server::run_server(listener, simulation, shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to wait for Ctrl+C signal: {}", e);
        // without a signal handler the only way out is killing the process
        std::future::pending::<()>().await;
    }
    tracing::info!("Ctrl+C received, shutting down");
}
