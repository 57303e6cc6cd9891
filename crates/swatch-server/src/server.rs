//! HTTP server hosting the Swatch API.
//!
//! The group routes are mounted under [`GROUPS_PATH`]. Environment bindings
//! are handed to the server at construction time and shared with every
//! handler through [`AppState`].

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use swatch_core::{Bindings, Result};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::groups;

/// Mount point of the group routes.
pub const GROUPS_PATH: &str = "/api/groups";

const DEFAULT_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
    8787,
);

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Enable CORS.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR,
            cors: false,
        }
    }
}

impl ServerConfig {
    /// Creates a new server config builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for ServerConfig.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    cors: Option<bool>,
}

impl ServerConfigBuilder {
    /// Sets the listen address.
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    /// Sets whether CORS is enabled.
    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors = Some(enabled);
        self
    }

    /// Builds the server config.
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            addr: self.addr.unwrap_or(DEFAULT_ADDR),
            cors: self.cors.unwrap_or(false),
        }
    }
}

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    /// Host environment bindings.
    pub bindings: Bindings,
    /// Server configuration.
    pub config: ServerConfig,
}

impl AppState {
    /// Creates new app state.
    pub fn new(config: ServerConfig, bindings: Bindings) -> Self {
        Self {
            bindings,
            config,
        }
    }
}

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Creates a new server with the given configuration and bindings.
    pub fn new(config: ServerConfig, bindings: Bindings) -> Self {
        let state = Arc::new(AppState::new(config.clone(), bindings));
        Self { config, state }
    }

    /// Creates the router.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(health))
            .nest(GROUPS_PATH, groups::router())
            .with_state(self.state.clone());

        router = router.layer(TraceLayer::new_for_http());

        if self.config.cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    /// Runs the server until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or the server fails.
    pub async fn run(self) -> Result<()> {
        let router = self.router();

        tracing::info!(
            addr = %self.config.addr,
            database = %self.state.bindings.database.name,
            "Starting Swatch server"
        );
        if !self.state.bindings.has_secret() {
            tracing::warn!("No JWT secret configured");
        }

        let listener = tokio::net::TcpListener::bind(self.config.addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| swatch_core::Error::internal(e.to_string()))?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Resolves when the process receives Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down gracefully"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down gracefully"),
    }
}

async fn health() -> &'static str {
    "OK"
}
