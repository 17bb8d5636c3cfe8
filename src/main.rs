//! kvline: a line-oriented key-value server
//!
//! Clients connect over TCP, send a single newline-terminated command, and
//! receive a single-line response before the connection closes:
//! - `PUT` + 8-byte key + value (up to 160 bytes) → `OK` / `NO`
//! - `GET` + 8-byte key → the stored value, or an empty line
//!
//! The store is in-memory and volatile. Configuration via CLI arguments
//! or TOML file.

mod config;
mod framer;
mod protocol;
mod server;
mod storage;

use config::Config;
use server::Server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        listen = %config.listen,
        max_connections = config.max_connections,
        "Starting kvline server"
    );

    Server::new(config).run().await
}
