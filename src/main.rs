// src/main.rs

//! The main entry point for the KeyGate server application.

use anyhow::Result;
use keygate::config::Config;
use keygate::server;
use std::env;
use tracing::error;
use tracing_subscriber::{filter::EnvFilter, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let args: Vec<String> = env::args().collect();

    if args.contains(&"--version".to_string()) {
        println!("KeyGate version {VERSION}");
        return Ok(());
    }

    // The configuration path comes from --config, defaulting to "config.toml".
    let config_path = args
        .iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
        .unwrap_or("config.toml");

    let mut config = match Config::from_file(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration from \"{config_path}\": {e:#}");
            std::process::exit(1);
        }
    };

    if let Some(port_index) = args.iter().position(|arg| arg == "--port") {
        if let Some(port_str) = args.get(port_index + 1) {
            match port_str.parse::<u16>() {
                Ok(port) if port != 0 => config.port = port,
                _ => {
                    eprintln!("Invalid port number: {port_str}");
                    std::process::exit(1);
                }
            }
        } else {
            eprintln!("--port flag requires a value");
            std::process::exit(1);
        }
    }

    // RUST_LOG wins over the configured level.
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true),
        )
        .init();

    if let Err(e) = server::run(config).await {
        error!("Server runtime error: {}", e);
        return Err(e);
    }
    Ok(())
}
