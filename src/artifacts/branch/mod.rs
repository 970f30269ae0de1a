//! Branch name management
//!
//! Branch names are validated against Git's illegal patterns before any ref
//! file is created: no leading dot or slash, no `..`, no `.lock` suffix, no
//! control characters or ref-syntax metacharacters.

pub mod branch_name;

/// Regex pattern for invalid branch names
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
