//! Merge engine
//!
//! Merging `theirs` into the current HEAD follows a fixed decision tree:
//!
//! 1. `ours == theirs` — already up to date, no action
//! 2. `theirs` is an ancestor of `ours` — already up to date, no action
//! 3. `ours` is an ancestor of `theirs` — fast-forward: move the ref,
//!    materialize, no new commit
//! 4. otherwise — three-way merge against `merge_base(ours, theirs)`
//!
//! The three-way merge flattens base, ours, and theirs into path maps and
//! resolves each path in the union: entries equal on both sides (or changed
//! on only one) are taken outright; paths edited differently on both sides
//! conflict. Conflicts synthesize a marker blob
//! (`<<<<<<< HEAD` / `=======` / `>>>>>>> <target>`), which is staged and
//! written to the working tree; no merge commit is created and
//! `MergeConflict` is surfaced. A clean merge commits with parents
//! `[ours, theirs]`.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::errors::EngineError;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::history::walker::HistoryWalker;
use crate::artifacts::index::entry_mode::FileMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::debug;

/// How a merge concluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The target is already contained in the current history
    AlreadyUpToDate,
    /// The current branch ref was advanced along an existing chain
    FastForward(ObjectId),
    /// A new merge commit was created
    Merged(ObjectId),
}

/// Merge executor bound to a repository and its loaded index
pub struct Merge<'r> {
    repository: &'r Repository,
    index: &'r mut Index,
}

impl<'r> Merge<'r> {
    pub fn new(repository: &'r Repository, index: &'r mut Index) -> Self {
        Self { repository, index }
    }

    /// Merge `theirs` into the current HEAD
    ///
    /// `target_name` labels the theirs side of conflict markers. On
    /// conflict, the working tree and index are left holding the conflicted
    /// state (persisted), no commit is written, and `MergeConflict` is
    /// returned.
    pub fn run(
        &mut self,
        target_name: &str,
        theirs: &ObjectId,
        author: Author,
        message: &str,
    ) -> anyhow::Result<MergeOutcome> {
        let ours = self
            .repository
            .refs()
            .read_head_oid()?
            .context("there is no commit on the current branch to merge into")?;

        if &ours == theirs {
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        let database = self.repository.database();
        let walker =
            HistoryWalker::new(|oid: &ObjectId| Ok(database.load_commit(oid)?.parents().to_vec()));

        if walker.is_ancestor(theirs, &ours)? {
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        if walker.is_ancestor(&ours, theirs)? {
            debug!(ours = %ours, theirs = %theirs, "fast-forwarding");
            return self.fast_forward(theirs);
        }

        let base = walker
            .merge_base(&ours, theirs)?
            .ok_or(EngineError::UnrelatedHistories)?;
        debug!(ours = %ours, theirs = %theirs, base = %base, "three-way merge");

        self.three_way(target_name, &ours, theirs, &base, author, message)
    }

    fn fast_forward(&mut self, theirs: &ObjectId) -> anyhow::Result<MergeOutcome> {
        let target = self.repository.database().flatten_commit_tree(theirs)?;

        let mut migration = Migration::new(self.repository, self.index, target);
        migration.apply_changes()?;
        self.index.write_updates()?;

        self.repository.refs().advance_head(theirs)?;

        Ok(MergeOutcome::FastForward(theirs.clone()))
    }

    fn three_way(
        &mut self,
        target_name: &str,
        ours: &ObjectId,
        theirs: &ObjectId,
        base: &ObjectId,
        author: Author,
        message: &str,
    ) -> anyhow::Result<MergeOutcome> {
        let database = self.repository.database();

        let base_map = database.flatten_commit_tree(base)?;
        let ours_map = database.flatten_commit_tree(ours)?;
        let theirs_map = database.flatten_commit_tree(theirs)?;

        let paths: BTreeSet<&PathBuf> = base_map
            .keys()
            .chain(ours_map.keys())
            .chain(theirs_map.keys())
            .collect();

        let mut merged: BTreeMap<PathBuf, DatabaseEntry> = BTreeMap::new();
        let mut conflicts: Vec<PathBuf> = Vec::new();

        for path in paths {
            let base_entry = base_map.get(path);
            let our_entry = ours_map.get(path);
            let their_entry = theirs_map.get(path);

            match (base_entry, our_entry, their_entry) {
                // equal on both sides, whatever the base says
                (_, Some(our), Some(their)) if our.oid == their.oid => {
                    merged.insert(path.clone(), our.clone());
                }
                // changed only on theirs
                (Some(b), Some(our), Some(their)) if our.oid == b.oid => {
                    merged.insert(path.clone(), their.clone());
                }
                // changed only on ours
                (Some(b), Some(our), Some(their)) if their.oid == b.oid => {
                    merged.insert(path.clone(), our.clone());
                }
                // edited differently on both sides
                (_, Some(our), Some(their)) => {
                    let entry = self.conflict_entry(target_name, path, our, their)?;
                    merged.insert(path.clone(), entry);
                    conflicts.push(path.clone());
                }
                // added only on theirs
                (None, None, Some(their)) => {
                    merged.insert(path.clone(), their.clone());
                }
                // added only on ours
                (None, Some(our), None) => {
                    merged.insert(path.clone(), our.clone());
                }
                // deleted on theirs, unchanged on ours
                (Some(b), Some(our), None) if our.oid == b.oid => {}
                // deleted on theirs but edited on ours: the edit survives
                (Some(_), Some(our), None) => {
                    merged.insert(path.clone(), our.clone());
                }
                // deleted on ours, unchanged on theirs
                (Some(b), None, Some(their)) if their.oid == b.oid => {}
                // deleted on ours but edited on theirs: the edit survives
                (Some(_), None, Some(their)) => {
                    merged.insert(path.clone(), their.clone());
                }
                // deleted on both sides
                (Some(_), None, None) => {}
                // unreachable: the path came from the union of the maps
                (None, None, None) => {}
            }
        }

        let tree_oid = self.build_merged_tree(&merged)?;

        if !conflicts.is_empty() {
            debug!(count = conflicts.len(), "merge produced conflicts");

            let mut migration = Migration::new(self.repository, self.index, merged);
            migration.apply_changes()?;
            self.index.write_updates()?;

            return Err(EngineError::MergeConflict { paths: conflicts }.into());
        }

        let commit = Commit::new(
            vec![ours.clone(), theirs.clone()],
            tree_oid,
            author,
            message.to_string(),
        );
        let commit_oid = database.store(&commit)?;

        self.repository.refs().advance_head(&commit_oid)?;

        let mut migration = Migration::new(self.repository, self.index, merged);
        migration.apply_changes()?;
        self.index.write_updates()?;

        Ok(MergeOutcome::Merged(commit_oid))
    }

    /// Synthesize and store the conflict-marker blob for a path
    fn conflict_entry(
        &self,
        target_name: &str,
        path: &PathBuf,
        ours: &DatabaseEntry,
        theirs: &DatabaseEntry,
    ) -> anyhow::Result<DatabaseEntry> {
        let database = self.repository.database();

        let our_blob = database
            .parse_object_as_blob(&ours.oid)?
            .with_context(|| format!("conflicted entry for {:?} is not a blob", path))?;
        let their_blob = database
            .parse_object_as_blob(&theirs.oid)?
            .with_context(|| format!("conflicted entry for {:?} is not a blob", path))?;

        let mut content = Vec::new();
        content.extend_from_slice(b"<<<<<<< HEAD\n");
        push_line_terminated(&mut content, our_blob.content());
        content.extend_from_slice(b"=======\n");
        push_line_terminated(&mut content, their_blob.content());
        content.extend_from_slice(format!(">>>>>>> {}\n", target_name).as_bytes());

        let conflict_blob = Blob::new(content);
        let oid = database.store(&conflict_blob)?;

        Ok(DatabaseEntry::new(oid, ours.mode))
    }

    fn build_merged_tree(
        &self,
        merged: &BTreeMap<PathBuf, DatabaseEntry>,
    ) -> anyhow::Result<ObjectId> {
        let entries = merged
            .iter()
            .map(|(path, entry)| {
                let mode = FileMode::try_from(entry.mode)
                    .with_context(|| format!("merged entry for {:?} has a directory mode", path))?;
                Ok(IndexEntry::new(path.clone(), entry.oid.clone(), mode))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let tree = Tree::build(entries.iter())?;

        let database = self.repository.database();
        tree.traverse(&|subtree: &Tree| {
            database.store(subtree)?;
            Ok(())
        })?;

        tree.object_id()
    }
}

/// Append content, guaranteeing a trailing newline so the next marker
/// starts on its own line
fn push_line_terminated(buffer: &mut Vec<u8>, content: &[u8]) {
    buffer.extend_from_slice(content);
    if !content.ends_with(b"\n") {
        buffer.push(b'\n');
    }
}
