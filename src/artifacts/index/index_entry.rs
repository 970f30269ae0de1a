//! Index entry representation
//!
//! Each entry in the index represents one staged file: its path relative to
//! the repository root, the blob digest of its staged content, and its file
//! mode. Change detection re-hashes file content, so no stat metadata is
//! cached here.

use crate::artifacts::index::entry_mode::FileMode;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::path::{Component, Path, PathBuf};

/// Index entry for a single staged file
#[derive(Debug, Clone, Eq, PartialEq, new)]
pub struct IndexEntry {
    /// File path relative to the repository root, forward-slash separated
    pub name: PathBuf,
    /// Blob digest of the staged content
    pub oid: ObjectId,
    /// File mode (regular or executable)
    pub mode: FileMode,
}

impl IndexEntry {
    pub fn basename(&self) -> anyhow::Result<&str> {
        self.name
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("invalid entry name: {:?}", self.name))
    }

    /// Directory segments leading to this entry, outermost first
    ///
    /// `a/b/c.txt` yields `["a", "b"]`.
    pub fn parent_dirs(&self) -> Vec<String> {
        let mut dirs = self
            .name
            .components()
            .filter_map(|component| match component {
                Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>();
        dirs.pop();

        dirs
    }
}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

/// Normalize a path for index storage
///
/// Rejects absolute paths and `.`/`..` segments, and rebuilds the path from
/// its normal components so the stored form is forward-slash relative.
pub fn normalize_path(path: &Path) -> anyhow::Result<PathBuf> {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(segment) => normalized.push(segment),
            Component::CurDir => {}
            Component::ParentDir => {
                anyhow::bail!("path {:?} contains a parent-directory segment", path)
            }
            Component::RootDir | Component::Prefix(_) => {
                anyhow::bail!("path {:?} is not relative to the repository root", path)
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        anyhow::bail!("path {:?} normalizes to nothing", path);
    }

    Ok(normalized)
}
