//! Working-tree migration
//!
//! A migration replaces the working tree and index with the contents of a
//! target tree:
//!
//! 1. Every currently indexed path missing from the target is deleted from
//!    the working tree (empty parent directories are pruned).
//! 2. Every target entry is written out, creating parent directories and
//!    restoring the recorded mode.
//! 3. The index is replaced with a mirror of the target map.
//!
//! ## Dirty guard
//!
//! Before any destructive step, every indexed path whose file still exists
//! is re-hashed; if any digest differs from the indexed one the migration
//! fails with `DirtyWorkingTree` and performs no mutation.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::core::errors::EngineError;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::FileMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Object;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// Planner and executor for materializing a tree into the working directory
pub struct Migration<'r> {
    repository: &'r Repository,
    /// Index to rewrite; the caller persists it afterwards
    index: &'r mut Index,
    /// Flattened target tree
    target: BTreeMap<PathBuf, DatabaseEntry>,
}

impl<'r> Migration<'r> {
    pub fn new(
        repository: &'r Repository,
        index: &'r mut Index,
        target: BTreeMap<PathBuf, DatabaseEntry>,
    ) -> Self {
        Self {
            repository,
            index,
            target,
        }
    }

    /// Run the dirty guard and apply the migration
    pub fn apply_changes(&mut self) -> anyhow::Result<()> {
        self.check_dirty()?;
        self.delete_stale_files()?;
        self.write_target_files()?;
        self.update_index()?;

        Ok(())
    }

    /// Fail `DirtyWorkingTree` if any indexed file was modified on disk
    fn check_dirty(&self) -> anyhow::Result<()> {
        let workspace = self.repository.workspace();
        let mut dirty = Vec::new();

        for entry in self.index.entries() {
            if !workspace.file_exists(&entry.name) {
                continue;
            }

            let blob = workspace.parse_blob(&entry.name)?;
            if blob.object_id()? != entry.oid {
                dirty.push(entry.name.clone());
            }
        }

        if !dirty.is_empty() {
            return Err(EngineError::DirtyWorkingTree { paths: dirty }.into());
        }

        Ok(())
    }

    fn delete_stale_files(&self) -> anyhow::Result<()> {
        let workspace = self.repository.workspace();

        for entry in self.index.entries() {
            if !self.target.contains_key(&entry.name) {
                debug!(path = %entry.name.display(), "removing stale file");
                workspace.remove_file(&entry.name)?;
            }
        }

        Ok(())
    }

    fn write_target_files(&self) -> anyhow::Result<()> {
        let workspace = self.repository.workspace();
        let database = self.repository.database();

        for (path, entry) in &self.target {
            let blob = database
                .parse_object_as_blob(&entry.oid)?
                .with_context(|| format!("object {} is not a blob", entry.oid))?;
            let mode = FileMode::try_from(entry.mode)
                .with_context(|| format!("tree entry for {:?} has a directory mode", path))?;

            workspace.write_file(path, blob.content(), mode)?;
        }

        Ok(())
    }

    fn update_index(&mut self) -> anyhow::Result<()> {
        let entries = self
            .target
            .iter()
            .map(|(path, entry)| {
                let mode = FileMode::try_from(entry.mode)?;
                Ok(IndexEntry::new(path.clone(), entry.oid.clone(), mode))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        self.index.replace(entries.into_iter());

        Ok(())
    }
}
