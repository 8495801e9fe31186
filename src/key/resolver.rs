//! Path resolution.
//!
//! # Responsibilities
//! - Walk candidates in precedence order
//! - Return the first one that is an existing regular file
//!
//! # Design Decisions
//! - Absence is an ordinary outcome (`None`), not an error
//! - Only stat calls; nothing is opened or cached

use std::path::{Path, PathBuf};

use crate::key::candidates::{CandidateList, CandidatePath};

/// Return the first candidate under `base_dir` that exists as a regular file.
pub fn resolve(base_dir: &Path, candidates: &CandidateList) -> Option<PathBuf> {
    resolve_match(base_dir, candidates).map(|(_, path)| path)
}

/// Like [`resolve`], but also report which candidate matched.
pub fn resolve_match<'a>(
    base_dir: &Path,
    candidates: &'a CandidateList,
) -> Option<(&'a CandidatePath, PathBuf)> {
    candidates.iter().find_map(|candidate| {
        let path = candidate.locate(base_dir);
        if path.is_file() {
            tracing::trace!(rank = candidate.rank(), path = %path.display(), "Candidate matched");
            Some((candidate, path))
        } else {
            None
        }
    })
}
