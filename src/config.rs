//! ==============================================================================
//! config.rs - Runtime Configuration Loader
//! ==============================================================================
//!
//! purpose:
//!     defines the schema for `sensor-mock.toml`.
//!     loads configuration from file or falls back to defaults, then applies
//!     command line overrides.
//!
//! structure:
//!     - ServerConfig: where the http api listens.
//!     - SimulationConfig: optional rng seed for a reproducible walk.
//!     - LoggingConfig: log level and per-reading debug output.
//!
//! the sensor roster itself is fixed in domain.rs and is NOT configurable.
//!
//! ==============================================================================

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Mock HTTP API serving drifting warehouse sensor readings.
#[derive(Parser, Debug, Default)]
#[command(version, about)]
pub struct Cli {
    /// Config file (skips the default search paths)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listen address
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Seed for the random walk
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct MockConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct SimulationConfig {
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub show_sensor_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_sensor_data: false,
        }
    }
}

impl MockConfig {
    /// Parse configuration from a toml string
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Load with default fallback
    pub fn load_or_default() -> Self {
        let paths = [
            PathBuf::from("config").join("sensor-mock.toml"),
            PathBuf::from("..").join("config").join("sensor-mock.toml"),
        ];

        for path in &paths {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        println!("[CONFIG] Loaded from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        println!("[CONFIG] Warning: Failed to load {}: {:#}", path.display(), e);
                    }
                }
            }
        }

        println!("[CONFIG] Warning: No config file found - using defaults");
        Self::default()
    }

    /// Resolve the final configuration: explicit file or search paths, then cli flags.
    /// An explicit --config that cannot be loaded is an error.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => {
                let config = Self::load(path)?;
                println!("[CONFIG] Loaded from {}", path.display());
                config
            }
            None => Self::load_or_default(),
        };
        config.apply_overrides(cli);
        Ok(config)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(seed) = cli.seed {
            self.simulation.seed = Some(seed);
        }
    }

    /// host:port string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        let seed = self
            .simulation
            .seed
            .map(|s| s.to_string())
            .unwrap_or_else(|| "random".to_string());
        println!("┌─────────────────────────────────────────┐");
        println!("│          MOCK API CONFIGURATION         │");
        println!("├─────────────────────────────────────────┤");
        println!("│ Listen: {}", self.bind_address());
        println!("│ Seed: {}", seed);
        println!("│ Log Level: {}", self.logging.level);
        println!("│ Show Sensor Data: {}", self.logging.show_sensor_data);
        println!("└─────────────────────────────────────────┘");
    }
}
