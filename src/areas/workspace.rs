//! Working directory operations
//!
//! The workspace is the user's checkout: every file the engine reads from or
//! writes into the working tree goes through here. Paths handed out are
//! always relative to the repository root, and engine-internal metadata
//! (`.kit` and friends) is never enumerated.

use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use is_executable::IsExecutable;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 4] = [".kit", ".git", ".", ".."];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a working-tree file into a blob
    pub fn parse_blob(&self, path: &Path) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(path)?))
    }

    /// List all files under the given root (or the whole workspace),
    /// relative to the repository root, skipping engine-internal paths
    pub fn list_files(&self, root: Option<PathBuf>) -> anyhow::Result<Vec<PathBuf>> {
        let root = match root {
            Some(p) => std::fs::canonicalize(&p)
                .with_context(|| format!("the specified path does not exist: {:?}", p))?,
            None => self.path.to_path_buf(),
        };

        if root.is_file() {
            return Ok(vec![
                root.strip_prefix(self.path.as_ref())
                    .map(PathBuf::from)
                    .unwrap_or_default(),
            ]);
        }

        let mut files = WalkDir::new(&root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| self.check_if_not_ignored_file_path(entry.path()))
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                IGNORED_PATHS.contains(&name.to_string_lossy().as_ref())
            } else {
                false
            }
        })
    }

    fn check_if_not_ignored_file_path(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() && !Self::is_ignored(path) {
            Some(path.strip_prefix(self.path.as_ref()).ok()?.to_path_buf())
        } else {
            None
        }
    }

    pub fn file_exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Vec<u8>> {
        let file_path = self.path.join(file_path);

        std::fs::read(&file_path).with_context(|| format!("failed to read file {:?}", file_path))
    }

    /// The staged mode a working-tree file would get
    pub fn file_mode(&self, file_path: &Path) -> FileMode {
        if self.path.join(file_path).is_executable() {
            FileMode::Executable
        } else {
            FileMode::Regular
        }
    }

    /// Write file content, creating parent directories and restoring the
    /// recorded mode
    pub fn write_file(&self, file_path: &Path, data: &[u8], mode: FileMode) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {:?}", parent))?;
        }

        std::fs::write(&full_path, data)
            .with_context(|| format!("failed to write file {:?}", full_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(EntryMode::from(mode).as_u32());
            std::fs::set_permissions(&full_path, permissions)
                .with_context(|| format!("failed to set permissions on {:?}", full_path))?;
        }

        Ok(())
    }

    /// Delete a file and clean now-empty parent directories, stopping at
    /// the repository root
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_file() {
            std::fs::remove_file(&full_path)
                .with_context(|| format!("failed to remove file {:?}", full_path))?;
        }

        let mut parent = full_path.parent();
        while let Some(dir) = parent {
            if dir == self.path.as_ref() {
                break;
            }
            if dir.read_dir().map(|mut d| d.next().is_some()).unwrap_or(true) {
                break;
            }
            std::fs::remove_dir(dir)
                .with_context(|| format!("failed to remove directory {:?}", dir))?;
            parent = dir.parent();
        }

        Ok(())
    }
}
