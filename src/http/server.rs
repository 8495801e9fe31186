//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the well-known key route
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to a plain or TLS listener
//! - Graceful shutdown on the lifecycle signal

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::http::key::{get_key, head_key, WELL_KNOWN_PATH};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::key::{FsKeySource, KeySource};
use crate::net::tls::load_tls_config;

/// How long in-flight TLS connections get to finish after shutdown.
const TLS_DRAIN_SECS: u64 = 10;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub keys: Arc<dyn KeySource>,
    pub config: Arc<ServiceConfig>,
}

/// HTTP server publishing the public key.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server reading keys from the configured directory.
    pub fn new(config: ServiceConfig) -> Self {
        let source = FsKeySource::from_config(&config.key);
        Self::with_source(config, Arc::new(source))
    }

    /// Create a server over an arbitrary key source.
    pub fn with_source(config: ServiceConfig, keys: Arc<dyn KeySource>) -> Self {
        let state = AppState {
            keys,
            config: Arc::new(config),
        };
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let timeout = Duration::from_secs(state.config.timeouts.request_secs);
        Router::new()
            .route(WELL_KNOWN_PATH, get(get_key).head(head_key))
            .with_state(state)
            .layer(TimeoutLayer::new(timeout))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Shared state, for mounting the admin API next to this server.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Consume the server and hand back its router.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.state.config
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            path = WELL_KNOWN_PATH,
            display_name = %self.state.config.key.display_name,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run over TLS using the certificate pair from `listener.tls`.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let tls = self.state.config.listener.tls.clone().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "listener.tls is not set")
        })?;
        let rustls = load_tls_config(&tls).await?;

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            shutdown_handle.graceful_shutdown(Some(Duration::from_secs(TLS_DRAIN_SECS)));
        });

        tracing::info!(
            address = %addr,
            path = WELL_KNOWN_PATH,
            display_name = %self.state.config.key.display_name,
            "HTTPS server starting"
        );

        axum_server::bind_rustls(addr, rustls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}
