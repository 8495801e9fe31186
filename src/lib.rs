//! Tesla Fleet API public key server.
//!
//! Finds a PEM public key under a base directory and publishes it at
//! `/.well-known/appspecific/com.tesla.3p.public-key.pem`.

pub mod admin;
pub mod config;
pub mod http;
pub mod key;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod verify;

pub use config::schema::ServiceConfig;
pub use http::{HttpServer, WELL_KNOWN_PATH};
pub use lifecycle::Shutdown;
