//! References (branches and HEAD)
//!
//! References are human-readable names pointing at commits:
//! - `HEAD` is either symbolic (`ref: refs/heads/<name>\n`) or detached
//!   (`<64-hex>\n`)
//! - branches live under `refs/heads/<name>`, one digest plus newline each
//!
//! Before the first commit, `HEAD` is symbolic to a branch whose backing
//! file does not exist yet; that is the only legal "branch exists logically
//! but has no commit" state.
//!
//! Ref files are written under exclusive `file_guard` locks.

use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::core::errors::EngineError;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// References manager rooted at the repository metadata directory
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.kit`)
    path: Box<Path>,
}

/// Where HEAD currently points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// Symbolic HEAD on a branch; `oid` is absent before the first commit
    Branch {
        name: BranchName,
        oid: Option<ObjectId>,
    },
    /// Detached HEAD pointing directly at a commit
    Detached(ObjectId),
}

impl Head {
    pub fn oid(&self) -> Option<&ObjectId> {
        match self {
            Head::Branch { oid, .. } => oid.as_ref(),
            Head::Detached(oid) => Some(oid),
        }
    }

    pub fn branch_name(&self) -> Option<&BranchName> {
        match self {
            Head::Branch { name, .. } => Some(name),
            Head::Detached(_) => None,
        }
    }
}

/// Parsed content of a ref file
#[derive(Debug, Clone)]
enum SymRefOrOid {
    SymRef(SymRefName),
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_from(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        match symref_match {
            Some(symref_match) => Ok(Some(SymRefOrOid::SymRef(SymRefName::new(
                symref_match[1].to_string(),
            )))),
            None => Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?))),
        }
    }
}

impl Refs {
    /// Read and classify HEAD
    pub fn get_head(&self) -> anyhow::Result<Head> {
        let head = SymRefOrOid::read_from(&self.head_path())?
            .ok_or_else(|| EngineError::InvalidRef("HEAD".to_string()))?;

        match head {
            SymRefOrOid::Oid(oid) => Ok(Head::Detached(oid)),
            SymRefOrOid::SymRef(sym_ref) => {
                let name = BranchName::try_parse_sym_ref_name(&sym_ref)
                    .map_err(|_| EngineError::InvalidRef(sym_ref.to_string()))?;
                let oid = self.resolve_ref(&sym_ref)?;

                Ok(Head::Branch { name, oid })
            }
        }
    }

    /// The commit HEAD resolves to, if any
    pub fn read_head_oid(&self) -> anyhow::Result<Option<ObjectId>> {
        Ok(self.get_head()?.oid().cloned())
    }

    /// The currently checked-out branch, None when detached
    pub fn current_branch(&self) -> anyhow::Result<Option<BranchName>> {
        Ok(self.get_head()?.branch_name().cloned())
    }

    /// Point HEAD at a branch by name
    pub fn set_head_symbolic(&self, branch: &BranchName) -> anyhow::Result<()> {
        debug!(branch = %branch, "setting symbolic HEAD");
        self.write_ref_file(&self.head_path(), &format!("ref: refs/heads/{}\n", branch))
    }

    /// Point HEAD directly at a commit
    pub fn set_head_detached(&self, oid: &ObjectId) -> anyhow::Result<()> {
        debug!(oid = %oid, "detaching HEAD");
        self.write_ref_file(&self.head_path(), &format!("{}\n", oid))
    }

    /// Write a digest into a ref file, creating intermediate directories
    pub fn update_ref(&self, sym_ref: &SymRefName, oid: &ObjectId) -> anyhow::Result<()> {
        let ref_path = self.path.join(sym_ref.as_ref_path());
        debug!(sym_ref = %sym_ref, oid = %oid, "updating ref");

        self.write_ref_file(&ref_path, &format!("{}\n", oid))
    }

    /// Resolve a ref to a digest, following symbolic indirection
    pub fn resolve_ref(&self, sym_ref: &SymRefName) -> anyhow::Result<Option<ObjectId>> {
        self.resolve_path(&self.path.join(sym_ref.as_ref_path()))
    }

    fn resolve_path(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        match SymRefOrOid::read_from(path)? {
            Some(SymRefOrOid::SymRef(sym_ref)) => {
                self.resolve_path(&self.path.join(sym_ref.as_ref_path()))
            }
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(None),
        }
    }

    /// Advance whatever HEAD points at to a new commit
    ///
    /// A symbolic HEAD advances its branch ref (creating the backing file
    /// on the first commit); a detached HEAD is rewritten in place.
    pub fn advance_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        match self.get_head()? {
            Head::Branch { name, .. } => self.update_ref(&SymRefName::for_branch(&name), oid),
            Head::Detached(_) => self.set_head_detached(oid),
        }
    }

    /// Create a branch pointing at the given commit
    pub fn create_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(name.as_ref());

        if branch_path.exists() {
            return Err(EngineError::BranchAlreadyExists(name.to_string()).into());
        }

        self.write_ref_file(&branch_path, &format!("{}\n", oid))
    }

    /// Delete a branch, rejecting the currently checked-out one
    pub fn delete_branch(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        if self.current_branch()?.as_ref() == Some(name) {
            return Err(EngineError::BranchInUse(name.to_string()).into());
        }

        let branch_path = self.heads_path().join(name.as_ref());
        let oid = self
            .resolve_path(&branch_path)?
            .ok_or_else(|| EngineError::NotFound(format!("branch '{}'", name)))?;

        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_empty_parent_dirs(&branch_path)?;

        Ok(oid)
    }

    /// List all branches by walking `refs/heads`
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&heads_path).ok()?;
                BranchName::try_parse(relative.to_string_lossy().into_owned()).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn write_ref_file(&self, path: &Path, content: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("failed to locate parent directory for ref file at {:?}", path)
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(content.as_bytes())?;

        Ok(())
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent)
                .with_context(|| format!("failed to remove empty ref directory at {:?}", parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    pub fn head_path(&self) -> std::path::PathBuf {
        self.path.join("HEAD")
    }

    pub fn refs_path(&self) -> std::path::PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> std::path::PathBuf {
        self.refs_path().join("heads")
    }
}
