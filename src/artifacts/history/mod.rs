//! Commit history traversal
//!
//! - `walker`: ancestry queries and merge-base computation over the commit
//!   graph

pub mod walker;
