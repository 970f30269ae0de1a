//! Working tree status
//!
//! - `file_change`: change classification enums
//! - `inspector`: three-way comparison of HEAD, index, and working tree
//! - `status_info`: the computed status report

pub mod file_change;
pub mod inspector;
pub mod status_info;
