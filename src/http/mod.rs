//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign request ID)
//!     → key.rs (resolve + read the key, GET/HEAD)
//!     → response.rs (PEM headers, diagnostic bodies)
//!     → Send to client
//! ```

pub mod key;
pub mod request;
pub mod response;
pub mod server;

pub use key::WELL_KNOWN_PATH;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
