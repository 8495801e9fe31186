//! Operator verification of the published key.
//!
//! # Data Flow
//! ```text
//! key-cli verify / POST /admin/verify
//!     → check.rs (GET public URL, bounded timeout)
//!     → report.rs (status + PEM markers → pass/fail, preview)
//! ```
//!
//! # Design Decisions
//! - Crosses the network, so every check carries a timeout (default 10s)
//! - A failed check is a report, never an error
//! - At most `MAX_BODY_BYTES` of the body are read

pub mod check;
pub mod report;

pub use check::{Verifier, VerifyError, MAX_BODY_BYTES};
pub use report::{VerificationReport, BEGIN_MARKER, END_MARKER};
