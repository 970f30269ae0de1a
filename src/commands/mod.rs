//! Command implementations
//!
//! Commands are thin veneers over the engine, implemented as
//! `impl Repository` extension blocks:
//!
//! - `plumbing`: low-level object commands (hash-object, cat-file, ls-tree)
//! - `porcelain`: user-facing commands (init, add, commit, status, branch,
//!   checkout, merge, log)
//!
//! The command layer owns all printing and error-to-message translation;
//! the engine itself never writes to stdout.

pub mod plumbing;
pub mod porcelain;
