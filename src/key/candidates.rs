//! Ordered candidate locations for the public key file.

use std::path::{Path, PathBuf};

/// One place the key file may live.
///
/// The template is joined onto the base directory; an absolute template
/// replaces the base entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePath {
    rank: usize,
    template: String,
}

impl CandidatePath {
    /// Position in the search order, 0 is checked first.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The path exactly as configured.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Concrete location of this candidate under `base_dir`.
    pub fn locate(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.template)
    }
}

/// Candidate paths in precedence order. Built once from config, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    entries: Vec<CandidatePath>,
}

impl CandidateList {
    pub fn new<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = templates
            .into_iter()
            .enumerate()
            .map(|(rank, template)| CandidatePath {
                rank,
                template: template.into(),
            })
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidatePath> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured templates joined for operator-facing messages.
    pub fn describe(&self) -> String {
        self.entries
            .iter()
            .map(|c| c.template.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn templates(&self) -> Vec<String> {
        self.entries.iter().map(|c| c.template.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_follows_list_order() {
        let list = CandidateList::new(["a.pem", "b.pem", "c.pem"]);
        let ranks: Vec<(usize, &str)> = list.iter().map(|c| (c.rank(), c.template())).collect();
        assert_eq!(ranks, vec![(0, "a.pem"), (1, "b.pem"), (2, "c.pem")]);
        assert_eq!(list.describe(), "a.pem, b.pem, c.pem");
    }

    #[test]
    fn test_absolute_template_ignores_base() {
        let list = CandidateList::new(["/etc/keys/tesla.pem", "nested/key.pem"]);
        let mut iter = list.iter();
        assert_eq!(
            iter.next().unwrap().locate(Path::new("/config")),
            PathBuf::from("/etc/keys/tesla.pem")
        );
        assert_eq!(
            iter.next().unwrap().locate(Path::new("/config")),
            PathBuf::from("/config/nested/key.pem")
        );
    }
}
