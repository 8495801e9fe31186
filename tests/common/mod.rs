//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tesla_key_server::config::ServiceConfig;
use tesla_key_server::key::KeySource;
use tesla_key_server::{HttpServer, Shutdown, WELL_KNOWN_PATH};
use tokio::net::TcpListener;

pub const PEM: &str = "-----BEGIN PUBLIC KEY-----\nABC\n-----END PUBLIC KEY-----\n";

/// A server running on an ephemeral port. Stops when dropped.
pub struct RunningServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl RunningServer {
    pub fn key_url(&self) -> String {
        format!("http://{}{}", self.addr, WELL_KNOWN_PATH)
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config pointing at `base_dir` with the default candidate list.
pub fn config_for(base_dir: &Path) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.key.base_dir = base_dir.display().to_string();
    config
}

async fn spawn(server: HttpServer) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningServer { addr, shutdown }
}

/// Start the server reading from the filesystem.
pub async fn start_server(config: ServiceConfig) -> RunningServer {
    spawn(HttpServer::new(config)).await
}

/// Start the server over a custom key source.
pub async fn start_server_with_source(
    config: ServiceConfig,
    source: Arc<dyn KeySource>,
) -> RunningServer {
    spawn(HttpServer::with_source(config, source)).await
}

/// Write `content` to `rel` under `base`, creating parent directories.
pub fn write_key(base: &Path, rel: &str, content: &str) -> PathBuf {
    let path = base.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
