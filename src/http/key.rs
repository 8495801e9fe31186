//! Handlers for the well-known public key route.
//!
//! # Responsibilities
//! - GET: resolve, read, return the PEM text
//! - HEAD: same lookup as GET, headers with `Content-Length`, no body
//! - Map lookup failures to 404 / 500 and log them
//!
//! # Design Decisions
//! - Deliberately unauthenticated; the artifact is a public key
//! - Blocking file I/O runs on tokio's blocking pool
//! - Nothing is cached between requests

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::request::request_id;
use crate::http::response::{not_found_body, pem_headers, READ_FAILURE_BODY};
use crate::http::server::AppState;
use crate::key::{KeyError, KeySource};
use crate::observability::metrics;

/// Path third parties fetch the key from. Not configurable.
pub const WELL_KNOWN_PATH: &str = "/.well-known/appspecific/com.tesla.3p.public-key.pem";

/// Run a key lookup off the async executor.
async fn with_source<T, F>(source: Arc<dyn KeySource>, f: F) -> Result<T, KeyError>
where
    T: Send + 'static,
    F: FnOnce(&dyn KeySource) -> Result<T, KeyError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(source.as_ref()))
        .await
        .unwrap_or_else(|e| Err(KeyError::Task(e.to_string())))
}

/// `GET` on the well-known path.
pub async fn get_key(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers).to_string();

    let response = match with_source(state.keys.clone(), |keys| keys.fetch()).await {
        Ok(key) => {
            tracing::debug!(
                request_id = %request_id,
                path = %key.path.display(),
                size = key.size,
                "Serving public key"
            );
            (StatusCode::OK, pem_headers(), key.content).into_response()
        }
        Err(KeyError::NotFound { searched }) => {
            tracing::error!(
                request_id = %request_id,
                searched = %searched,
                "Public key not found"
            );
            (StatusCode::NOT_FOUND, not_found_body(state.keys.candidates())).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to read public key");
            (StatusCode::INTERNAL_SERVER_ERROR, READ_FAILURE_BODY).into_response()
        }
    };

    metrics::record_request("GET", response.status().as_u16(), start_time);
    response
}

/// `HEAD` on the well-known path.
pub async fn head_key(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers).to_string();

    let response = match with_source(state.keys.clone(), |keys| keys.fetch()).await {
        Ok(key) => {
            let mut response = (StatusCode::OK, pem_headers()).into_response();
            response
                .headers_mut()
                .insert(header::CONTENT_LENGTH, HeaderValue::from(key.size));
            response
        }
        Err(KeyError::NotFound { searched }) => {
            tracing::error!(
                request_id = %request_id,
                searched = %searched,
                "Public key not found"
            );
            StatusCode::NOT_FOUND.into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to read public key");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    };

    metrics::record_request("HEAD", response.status().as_u16(), start_time);
    response
}
