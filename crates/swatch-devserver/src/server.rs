//! The development server: proxies matching paths, serves files otherwise.

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use swatch_core::{Error, Result};
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::DevConfig;
use crate::proxy;

struct DevState {
    config: DevConfig,
    client: reqwest::Client,
}

/// Development server built from a [`DevConfig`].
pub struct DevServer {
    state: Arc<DevState>,
}

impl DevServer {
    /// Creates a dev server.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: DevConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| Error::internal(format!("failed to build proxy client: {e}")))?;
        Ok(Self {
            state: Arc::new(DevState { config, client }),
        })
    }

    /// Returns the configuration the server runs with.
    #[must_use]
    pub fn config(&self) -> &DevConfig {
        &self.state.config
    }

    /// Creates the router.
    pub fn router(&self) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
    }

    /// Serves until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or the server fails.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let config = self.config();
        let addr = config.listen_addr();

        tracing::info!(
            addr = %addr,
            root = %config.root.display(),
            plugins = ?config.plugins,
            "Starting dev server"
        );
        for rule in &config.server.proxy {
            tracing::info!(
                prefix = %rule.prefix,
                target = %rule.target,
                change_origin = rule.change_origin,
                "Proxy rule"
            );
        }

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| Error::internal(e.to_string()))?;

        tracing::info!("Dev server stopped");
        Ok(())
    }
}

async fn dispatch(State(state): State<Arc<DevState>>, request: Request) -> Response {
    let path = request.uri().path().to_string();

    if let Some(rule) = state.config.proxy_for(&path) {
        return match proxy::forward(&state.client, rule, request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Proxy request failed");
                let status = match e {
                    Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    Error::Upstream { .. } => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.to_string()).into_response()
            },
        };
    }

    match ServeDir::new(&state.config.root).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
