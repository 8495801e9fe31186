use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::http::WELL_KNOWN_PATH;
use crate::verify::Verifier;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub display_name: String,
    pub served_path: &'static str,
    pub key_found: bool,
    /// Configured candidate that currently matches.
    pub matched_candidate: Option<String>,
    pub candidates: Vec<String>,
}

pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let keys = state.keys.clone();
    let located = tokio::task::spawn_blocking(move || keys.locate())
        .await
        .ok()
        .flatten();

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        display_name: state.config.key.display_name.clone(),
        served_path: WELL_KNOWN_PATH,
        key_found: located.is_some(),
        matched_candidate: located.map(|l| l.candidate),
        candidates: state.keys.candidates().templates(),
    })
}

pub async fn post_verify(State(state): State<AppState>) -> impl IntoResponse {
    let Some(url) = state.config.verification.public_url.clone() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "verification.public_url is not configured" })),
        )
            .into_response();
    };

    let verifier = match Verifier::from_config(&state.config.verification) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create verifier");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let report = verifier.check(&url).await;
    tracing::info!(
        display_name = %state.config.key.display_name,
        summary = %report.summary(),
        "Verification finished"
    );
    Json(report).into_response()
}
