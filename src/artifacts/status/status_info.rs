use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// The computed three-way status of a repository
///
/// All categories are engine data; rendering belongs to the caller.
#[derive(Debug, Default)]
pub struct StatusReport {
    /// Index vs HEAD: changes that would go into the next commit
    pub staged: BTreeMap<PathBuf, IndexChangeType>,
    /// Working tree vs index: changes not yet staged
    pub unstaged: BTreeMap<PathBuf, WorkspaceChangeType>,
    /// Working-tree paths the index knows nothing about
    pub untracked: BTreeSet<PathBuf>,
}

impl StatusReport {
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty() && self.untracked.is_empty()
    }
}
