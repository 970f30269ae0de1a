//! Index (staging area) file format
//!
//! The index maps working-tree paths to the blob digest and mode staged for
//! the next commit. Persistence is a versioned text file, one entry per
//! line, stable across processes and human-inspectable:
//!
//! ```text
//! kit-index 1
//! 100644 <64-hex> a.txt
//! 100755 <64-hex> bin/run.sh
//! ```
//!
//! Entries are sorted by path. Paths are forward-slash relative to the
//! repository root with no `.` or `..` segments and no leading slash.

pub mod entry_mode;
pub mod index_entry;

/// Magic first line identifying index files
pub const SIGNATURE: &str = "kit-index";

/// Index file format version
pub const VERSION: u32 = 1;
