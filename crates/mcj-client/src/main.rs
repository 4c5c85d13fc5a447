mod config;
mod connection;
mod error;
mod handshake;
mod session;
mod sink;

use std::path::Path;
use std::sync::Arc;

use config::ClientConfig;
use connection::{Connection, ConnectionOptions};
use mcj_command::ParserRegistry;
use mcj_data::RegistrySet;
use session::OfflineSession;
use sink::LoggingSink;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ClientConfig::load("client.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load client.toml: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "MCJ client v{} connecting to {}:{} as {} (protocol {})",
        env!("CARGO_PKG_VERSION"),
        config.server.address,
        config.server.port,
        config.account.username,
        config.server.protocol_version
    );

    let options = match ConnectionOptions::from_config(&config) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let registries = match RegistrySet::load(Path::new(&config.registry.path)) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to load registry {}: {e}", config.registry.path);
            std::process::exit(1);
        }
    };

    let mut parsers = ParserRegistry::new();
    if !registries.command_parsers().is_empty() {
        parsers.set_numeric_ids(registries.command_parsers().to_vec());
    }

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    // Handle Ctrl+C
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let sink = LoggingSink::new(options.version);
    let connection = match Connection::connect(
        options,
        Arc::new(registries),
        Arc::new(parsers),
        Arc::new(OfflineSession),
        sink,
    )
    .await
    {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to connect: {e}");
            std::process::exit(1);
        }
    };

    match connection.run(shutdown_rx).await {
        Ok(()) => info!("Client shut down."),
        Err(e) => {
            error!("Connection ended: {e}");
            std::process::exit(1);
        }
    }
}
