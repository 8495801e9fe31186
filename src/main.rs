//! Tesla public key server.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────┐
//!                        │               TESLA KEY SERVER                 │
//!                        │                                                │
//!   GET/HEAD well-known  │  ┌─────────┐    ┌──────────┐    ┌───────────┐  │
//!   ─────────────────────┼─▶│  http   │───▶│   key    │───▶│ resolver  │──┼──▶ base_dir
//!                        │  │ server  │    │ handlers │    │ + source  │  │    candidates
//!   ◀────────────────────┼──│         │◀───│          │◀───│           │  │
//!   PEM / 404 / 500      │  └─────────┘    └──────────┘    └───────────┘  │
//!                        │                                                │
//!   operator             │  ┌─────────┐    ┌──────────┐                   │
//!   ─────────────────────┼─▶│  admin  │───▶│  verify  │───────────────────┼──▶ public URL
//!                        │  └─────────┘    └──────────┘                   │
//!                        │                                                │
//!                        │  config · lifecycle · observability · net/tls  │
//!                        └───────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use tesla_key_server::admin::setup_admin_router;
use tesla_key_server::config::{load_config, ServiceConfig};
use tesla_key_server::lifecycle::{check_key_presence, signals, Shutdown};
use tesla_key_server::observability::{logging, metrics};
use tesla_key_server::HttpServer;

#[derive(Parser)]
#[command(name = "tesla-key-server")]
#[command(about = "Serve a Tesla Fleet API public key at its well-known path", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                logging::init_logging(&ServiceConfig::default().observability);
                tracing::error!(path = %path.display(), error = %e, "Failed to load configuration");
                return Err(e.into());
            }
        },
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("tesla-key-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        base_dir = %config.key.base_dir,
        candidates = config.key.candidates.len(),
        display_name = %config.key.display_name,
        "Configuration loaded"
    );

    let server = HttpServer::new(config.clone());
    let state = server.state();

    if let Err(e) = check_key_presence(state.keys.as_ref(), config.key.startup_policy) {
        tracing::error!(error = %e, "Setup failed");
        return Err(e.into());
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    if config.admin.enabled {
        let admin_listener = TcpListener::bind(&config.admin.bind_address).await?;
        let admin_router = setup_admin_router(state);
        let mut admin_shutdown = shutdown.subscribe();
        tracing::info!(address = %admin_listener.local_addr()?, "Admin API listening");
        tokio::spawn(async move {
            let result = axum::serve(admin_listener, admin_router)
                .with_graceful_shutdown(async move {
                    let _ = admin_shutdown.recv().await;
                })
                .await;
            if let Err(e) = result {
                tracing::error!(error = %e, "Admin API stopped with error");
            }
        });
    }

    if config.listener.tls.is_some() {
        let addr: SocketAddr = config.listener.bind_address.parse()?;
        server.run_tls(addr, shutdown.subscribe()).await?;
    } else {
        let listener = TcpListener::bind(&config.listener.bind_address).await?;
        server.run(listener, shutdown.subscribe()).await?;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
