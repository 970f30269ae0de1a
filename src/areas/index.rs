//! Index (staging area)
//!
//! The index tracks which content should be included in the next commit as
//! a flat map from repository-relative paths to blob digests and modes.
//!
//! ## Persistence
//!
//! The index file is versioned text: a `kit-index 1` header line followed
//! by one `<mode> <digest> <path>` line per entry, sorted by path. An
//! absent file reads as an empty index. Rewrites go through a temporary
//! sibling plus rename, serialized by an exclusive lock on `index.lock`.

use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::index::index_entry::{IndexEntry, normalize_path};
use crate::artifacts::index::{SIGNATURE, VERSION};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::{Context, anyhow};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Staging area mapping paths to staged blob digests
#[derive(Debug)]
pub struct Index {
    /// Path to the index file (typically `.kit/index`)
    path: Box<Path>,
    /// Staged entries keyed by normalized path
    entries: BTreeMap<PathBuf, IndexEntry>,
    /// Whether the in-memory state has diverged from disk
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.changed = false;
    }

    /// Load the index from disk, replacing the in-memory state
    ///
    /// An absent index file yields an empty index. Reading holds a shared
    /// lock on the lock sibling so a concurrent writer cannot interleave.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let mut lock_file = self.open_lock_file()?;
        let _lock = file_guard::lock(&mut lock_file, file_guard::Lock::Shared, 0, 1)?;

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read index file at {:?}", self.path))?;

        self.parse(&content)
    }

    fn parse(&mut self, content: &str) -> anyhow::Result<()> {
        let mut lines = content.lines();

        let header = lines.next().ok_or_else(|| anyhow!("index file is empty"))?;
        let expected = format!("{} {}", SIGNATURE, VERSION);
        if header != expected {
            return Err(anyhow!(
                "unsupported index header '{}', expected '{}'",
                header,
                expected
            ));
        }

        for line in lines {
            if line.is_empty() {
                continue;
            }

            let mut parts = line.splitn(3, ' ');
            let mode = parts
                .next()
                .ok_or_else(|| anyhow!("index line missing mode: '{}'", line))?;
            let oid = parts
                .next()
                .ok_or_else(|| anyhow!("index line missing digest: '{}'", line))?;
            let path = parts
                .next()
                .ok_or_else(|| anyhow!("index line missing path: '{}'", line))?;

            let entry = IndexEntry::new(
                PathBuf::from(path),
                ObjectId::try_parse(oid.to_string())?,
                FileMode::try_from(mode)?,
            );
            self.entries.insert(entry.name.clone(), entry);
        }

        Ok(())
    }

    /// Stage an entry, inserting or overwriting its path
    pub fn add(&mut self, path: &Path, oid: ObjectId, mode: FileMode) -> anyhow::Result<()> {
        let name = normalize_path(path)?;

        self.entries
            .insert(name.clone(), IndexEntry::new(name, oid, mode));
        self.changed = true;

        Ok(())
    }

    /// Unstage a path; removing an absent path is a no-op
    pub fn remove(&mut self, path: &Path) -> anyhow::Result<()> {
        let name = normalize_path(path)?;

        if self.entries.remove(&name).is_some() {
            self.changed = true;
        }

        Ok(())
    }

    /// Replace the whole index with the given entries
    ///
    /// Used when a checkout or merge materializes a tree: the index must
    /// mirror the flattened tree exactly.
    pub fn replace(&mut self, entries: impl Iterator<Item = IndexEntry>) {
        self.entries = entries.map(|entry| (entry.name.clone(), entry)).collect();
        self.changed = true;
    }

    /// Persist the index atomically
    ///
    /// Serializes under an exclusive lock, writes a temporary sibling, and
    /// renames it into place so readers never observe a torn file.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut lock_file = self.open_lock_file()?;
        let _lock = file_guard::lock(&mut lock_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut content = format!("{} {}\n", SIGNATURE, VERSION);
        for entry in self.entries.values() {
            let path = entry
                .name
                .to_str()
                .ok_or_else(|| anyhow!("index path is not valid UTF-8: {:?}", entry.name))?;
            content.push_str(&format!(
                "{} {} {}\n",
                EntryMode::from(entry.mode).as_str(),
                entry.oid,
                path
            ));
        }

        let temp_path = self
            .path
            .with_extension(format!("tmp-{}", rand::random::<u32>()));
        let mut temp_file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .with_context(|| format!("failed to open temp index file at {:?}", temp_path))?;
        temp_file.write_all(content.as_bytes())?;

        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("failed to replace index file at {:?}", self.path))?;
        self.changed = false;

        Ok(())
    }

    fn open_lock_file(&self) -> anyhow::Result<std::fs::File> {
        let lock_path = self.path.with_extension("lock");

        std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("failed to open index lock file at {:?}", lock_path))
    }
}
