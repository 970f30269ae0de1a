//! Status inspection logic
//!
//! Computes the three-way status report by comparing:
//! - the flattened tree of the HEAD commit (empty before the first commit)
//! - the index
//! - the working-directory listing
//!
//! Change detection re-hashes file content against the staged digest, so
//! touched-but-identical files report clean.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::status_info::StatusReport;
use derive_new::new;

/// Three-way status inspector
#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
}

impl<'r> Inspector<'r> {
    /// Compute the full status report for the loaded index
    pub fn report(&self, index: &Index) -> anyhow::Result<StatusReport> {
        let mut report = StatusReport::default();

        self.compare_index_against_head(index, &mut report)?;
        self.compare_workspace_against_index(index, &mut report)?;

        Ok(report)
    }

    /// Staged changes: index Δ HEAD
    fn compare_index_against_head(
        &self,
        index: &Index,
        report: &mut StatusReport,
    ) -> anyhow::Result<()> {
        let head_map = match self.repository.refs().read_head_oid()? {
            Some(head_oid) => self.repository.database().flatten_commit_tree(&head_oid)?,
            None => Default::default(),
        };

        for entry in index.entries() {
            match head_map.get(&entry.name) {
                None => {
                    report
                        .staged
                        .insert(entry.name.clone(), IndexChangeType::Added);
                }
                Some(head_entry)
                    if head_entry.oid != entry.oid
                        || head_entry.mode != EntryMode::from(entry.mode) =>
                {
                    report
                        .staged
                        .insert(entry.name.clone(), IndexChangeType::Modified);
                }
                Some(_) => {}
            }
        }

        for path in head_map.keys() {
            if index.entry_by_path(path).is_none() {
                report.staged.insert(path.clone(), IndexChangeType::Deleted);
            }
        }

        Ok(())
    }

    /// Unstaged changes and untracked files: working tree Δ index
    fn compare_workspace_against_index(
        &self,
        index: &Index,
        report: &mut StatusReport,
    ) -> anyhow::Result<()> {
        let workspace = self.repository.workspace();

        for entry in index.entries() {
            if !workspace.file_exists(&entry.name) {
                report
                    .unstaged
                    .insert(entry.name.clone(), WorkspaceChangeType::Deleted);
                continue;
            }

            let blob = workspace.parse_blob(&entry.name)?;
            if blob.object_id()? != entry.oid {
                report
                    .unstaged
                    .insert(entry.name.clone(), WorkspaceChangeType::Modified);
            }
        }

        for path in workspace.list_files(None)? {
            if index.entry_by_path(&path).is_none() {
                report.untracked.insert(path);
            }
        }

        Ok(())
    }
}
