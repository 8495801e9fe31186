//! Public key discovery subsystem.
//!
//! # Data Flow
//! ```text
//! KeyConfig (base_dir, candidates)
//!     → candidates.rs (ordered CandidateList)
//!     → resolver.rs (first existing regular file)
//!     → source.rs (read per request)
//!     → http handlers
//! ```
//!
//! # Design Decisions
//! - Nothing is cached; each request sees the file as it is on disk now
//! - No shared mutable state, so concurrent requests need no locking
//! - The key file is never written

pub mod candidates;
pub mod resolver;
pub mod source;

pub use candidates::{CandidateList, CandidatePath};
pub use resolver::{resolve, resolve_match};
pub use source::{FsKeySource, KeyError, KeySource, Located, ServedKey};
