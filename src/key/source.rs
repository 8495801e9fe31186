//! Access to the key file.
//!
//! [`KeySource`] is the seam between the HTTP handlers and the filesystem.
//! Every call resolves again, so edits on disk show up on the next request.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::KeyConfig;
use crate::key::candidates::CandidateList;
use crate::key::resolver::resolve_match;

/// Errors that can occur while serving the key.
#[derive(Debug, Error)]
pub enum KeyError {
    /// No candidate exists right now.
    #[error("public key not found; searched: {searched}")]
    NotFound { searched: String },

    /// The file resolved but could not be read or stat'ed.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not UTF-8 text.
    #[error("{} is not valid UTF-8", .path.display())]
    Decode { path: PathBuf },

    /// The blocking worker running the lookup went away.
    #[error("key lookup task failed: {0}")]
    Task(String),
}

/// A candidate that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// Configured template that matched.
    pub candidate: String,
    pub path: PathBuf,
}

/// Key content captured for a single request.
#[derive(Debug, Clone)]
pub struct ServedKey {
    pub path: PathBuf,
    pub content: String,
    pub size: u64,
}

/// Where key bytes come from.
///
/// Implementations must be cheap to call per request and hold no
/// per-request state.
pub trait KeySource: Send + Sync + 'static {
    /// Candidates searched, in order.
    fn candidates(&self) -> &CandidateList;

    /// First existing candidate, if any.
    fn locate(&self) -> Option<Located>;

    /// Read the whole file.
    fn read(&self, path: &Path) -> Result<Vec<u8>, KeyError>;

    /// Resolve and read as UTF-8 text. GET and HEAD both go through here so
    /// they always agree on the status.
    fn fetch(&self) -> Result<ServedKey, KeyError> {
        let located = self.locate().ok_or_else(|| self.not_found())?;
        let bytes = self.read(&located.path)?;
        let size = bytes.len() as u64;
        let content = String::from_utf8(bytes).map_err(|_| KeyError::Decode {
            path: located.path.clone(),
        })?;
        Ok(ServedKey {
            path: located.path,
            content,
            size,
        })
    }

    fn not_found(&self) -> KeyError {
        KeyError::NotFound {
            searched: self.candidates().describe(),
        }
    }
}

/// Reads candidates from a base directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsKeySource {
    base_dir: PathBuf,
    candidates: CandidateList,
}

impl FsKeySource {
    pub fn new(base_dir: impl Into<PathBuf>, candidates: CandidateList) -> Self {
        Self {
            base_dir: base_dir.into(),
            candidates,
        }
    }

    pub fn from_config(config: &KeyConfig) -> Self {
        Self::new(
            &config.base_dir,
            CandidateList::new(config.candidates.iter().cloned()),
        )
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl KeySource for FsKeySource {
    fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    fn locate(&self) -> Option<Located> {
        resolve_match(&self.base_dir, &self.candidates).map(|(candidate, path)| Located {
            candidate: candidate.template().to_string(),
            path,
        })
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, KeyError> {
        fs::read(path).map_err(|source| KeyError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEM: &str = "-----BEGIN PUBLIC KEY-----\nABC\n-----END PUBLIC KEY-----\n";

    fn source_for(dir: &Path) -> FsKeySource {
        FsKeySource::new(
            dir,
            CandidateList::new(["tesla-public-key.pem", "tesla_fleet_public_key.pem"]),
        )
    }

    #[test]
    fn test_fetch_reads_current_content() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tesla_fleet_public_key.pem"), PEM).unwrap();
        let source = source_for(dir.path());

        let key = source.fetch().unwrap();
        assert_eq!(key.content, PEM);
        assert_eq!(key.size, PEM.len() as u64);

        fs::write(dir.path().join("tesla_fleet_public_key.pem"), "rotated").unwrap();
        assert_eq!(source.fetch().unwrap().content, "rotated");
    }

    #[test]
    fn test_locate_names_matching_candidate() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tesla-public-key.pem"), PEM).unwrap();
        let located = source_for(dir.path()).locate().unwrap();
        assert_eq!(located.candidate, "tesla-public-key.pem");
    }

    #[test]
    fn test_missing_reports_searched_list() {
        let dir = tempfile::tempdir().unwrap();
        match source_for(dir.path()).fetch() {
            Err(KeyError::NotFound { searched }) => {
                assert_eq!(searched, "tesla-public-key.pem, tesla_fleet_public_key.pem")
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tesla-public-key.pem"), [0xff, 0xfe, 0x00]).unwrap();
        let err = source_for(dir.path()).fetch().unwrap_err();
        assert!(matches!(err, KeyError::Decode { .. }));
    }

    #[test]
    fn test_size_counts_bytes_not_chars() {
        let dir = tempfile::tempdir().unwrap();
        let content = "-----BEGIN PUBLIC KEY-----
é
-----END PUBLIC KEY-----
";
        fs::write(dir.path().join("tesla-public-key.pem"), content).unwrap();
        let key = source_for(dir.path()).fetch().unwrap();
        assert_eq!(key.size, content.len() as u64);
        assert_eq!(key.size, content.chars().count() as u64 + 1);
    }
}
