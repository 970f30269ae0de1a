//! Working-tree materialization
//!
//! - `migration`: applies a committed tree to the working directory and
//!   index, guarded against overwriting uncommitted changes

pub mod migration;
