//! CLI command implementations.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};

use swatch_core::{Bindings, DatabaseHandle, InMemorySessionStore};
use swatch_devserver::{DevConfig, DevServer};
use swatch_server::{Server, ServerConfig};

use crate::config::Config;

/// Start the API server.
pub async fn serve(host: String, port: u16, cfg: &Config) -> Result<()> {
    let addr = format!("{}:{}", host, port)
        .parse::<SocketAddr>()
        .wrap_err_with(|| format!("invalid listen address {host}:{port}"))?;
    let config = ServerConfig::builder().addr(addr).build();

    let bindings = Bindings::new(
        DatabaseHandle::new(&cfg.database_name, &cfg.database_url),
        Arc::new(InMemorySessionStore::new()),
        cfg.jwt_secret.clone().unwrap_or_default(),
    );

    Server::new(config, bindings).run().await?;
    Ok(())
}

/// Start the frontend dev server.
pub async fn dev(config_file: Option<PathBuf>, port: Option<u16>) -> Result<()> {
    let mut config = DevConfig::load(config_file.as_deref())?;
    if let Some(port) = port {
        config.server.port = port;
    }

    DevServer::new(config)?
        .run(swatch_server::server::shutdown_signal())
        .await?;
    Ok(())
}

/// Write the current configuration to the config file.
pub fn init_config() -> Result<()> {
    let cfg = Config::load();
    cfg.save().wrap_err("failed to save config")?;
    println!("Config saved to: {}", Config::config_path().display());
    Ok(())
}

/// Display version information.
pub fn version() {
    println!("Swatch {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Components:");
    println!("  swatch-server     - Groups API");
    println!("  swatch-devserver  - Frontend dev server and /api proxy");
    println!("  swatch-shim       - Browser storage stand-ins for tests");
    println!("  swatch-telemetry  - Logging");
}
