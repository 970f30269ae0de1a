//! Engine error kinds
//!
//! Every failure the engine can surface deliberately is one of these kinds.
//! Functions still return `anyhow::Result`, so the kinds travel inside the
//! anyhow chain; callers that need to react to a specific condition (the CLI
//! picking an exit code, the merge command listing conflicted paths) use
//! `downcast_ref::<EngineError>()`. Plain I/O failures stay untyped and are
//! carried by anyhow with context.
//!
//! The engine never prints, logs to stdout, or exits; translation to user
//! messages happens entirely in the command layer.

use std::path::PathBuf;
use thiserror::Error;

/// Deliberate failure conditions of the repository engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invoked outside a repository root (no `.kit` found walking upward).
    #[error("not a kit repository (or any of the parent directories)")]
    NotARepository,

    /// A lookup target (object digest or reference) is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// A stored object is malformed: missing NUL, bad header, size mismatch,
    /// or failed decompression.
    #[error("object {0} is corrupted")]
    Corrupted(String),

    /// A reference is malformed or unresolvable.
    #[error("invalid reference: {0}")]
    InvalidRef(String),

    /// A destructive operation was refused because it would overwrite
    /// uncommitted local changes.
    #[error("local changes to {} path(s) would be overwritten", .paths.len())]
    DirtyWorkingTree { paths: Vec<PathBuf> },

    /// A three-way merge produced conflicted files. The working tree and
    /// index hold the conflicted state; no merge commit was written.
    #[error("merge conflicts in {} path(s)", .paths.len())]
    MergeConflict { paths: Vec<PathBuf> },

    /// Two commits share no common ancestor.
    #[error("refusing to merge unrelated histories")]
    UnrelatedHistories,

    #[error("branch '{0}' already exists")]
    BranchAlreadyExists(String),

    /// Deleting the currently checked-out branch is rejected.
    #[error("cannot delete branch '{0}': it is checked out")]
    BranchInUse(String),

    /// A graph traversal exceeded the depth bound, which only happens on
    /// pathological or corrupted repositories.
    #[error("history traversal exceeded {0} levels")]
    TooDeep(usize),
}
