//! Response construction for the well-known route.
//!
//! # Responsibilities
//! - Fixed PEM headers shared by GET and HEAD
//! - Plain-text diagnostic bodies for 404 and 500
//!
//! # Design Decisions
//! - Error bodies never mention resolved filesystem paths
//! - The 404 body lists configured candidates so operators know where to put the file

use axum::http::{header, HeaderName, HeaderValue};

use crate::key::CandidateList;

/// Media type of the served key.
pub const PEM_CONTENT_TYPE: &str = "application/x-pem-file";

/// Clients may cache the key for a day.
pub const PEM_CACHE_CONTROL: &str = "public, max-age=86400";

/// Body sent with a 500.
pub const READ_FAILURE_BODY: &str = "Failed to read public key";

/// Headers attached to every successful key response.
pub fn pem_headers() -> [(HeaderName, HeaderValue); 2] {
    [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static(PEM_CONTENT_TYPE),
        ),
        (
            header::CACHE_CONTROL,
            HeaderValue::from_static(PEM_CACHE_CONTROL),
        ),
    ]
}

/// Body sent with a 404 on GET.
pub fn not_found_body(candidates: &CandidateList) -> String {
    format!(
        "Public key not found. Place the PEM file at one of: {}\n",
        candidates.describe()
    )
}
