//! Tree object
//!
//! Trees represent directory snapshots. They contain entries for files
//! (blobs) and subdirectories (other trees), along with their names and
//! modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<32-byte-sha256>`
//!
//! Entries are serialized sorted ascending by name under byte-wise ordering,
//! so any two equivalent directory contents produce byte-identical trees and
//! therefore identical digests.
//!
//! ## Tree building
//!
//! Trees are built from index entries (bottom-up, children stored before
//! parents) or parsed from existing tree objects.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::BufRead;

/// Internal tree entry representation for trees being built
#[derive(Debug, Clone)]
enum TreeEntry {
    /// File entry (blob reference)
    File(IndexEntry),
    /// Directory entry (nested tree)
    Directory(Tree),
}

impl TreeEntry {
    fn mode(&self) -> EntryMode {
        match self {
            TreeEntry::File(entry) => entry.mode.into(),
            TreeEntry::Directory(_) => EntryMode::Directory,
        }
    }

    fn oid(&self) -> anyhow::Result<ObjectId> {
        match self {
            TreeEntry::File(entry) => Ok(entry.oid.clone()),
            TreeEntry::Directory(tree) => tree.object_id(),
        }
    }
}

/// Tree object representing a directory snapshot
///
/// Trees maintain two sets of entries:
/// - `readable_entries`: for trees parsed from the database
/// - `writeable_entries`: for trees being built from the index
#[derive(Debug, Clone, Default)]
pub struct Tree {
    /// Entries parsed from the database (read mode)
    readable_entries: BTreeMap<String, DatabaseEntry>,
    /// Entries being built (write mode)
    writeable_entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    /// Build a nested tree from flat index entries
    ///
    /// Partitions each entry path by its leading segment: bare names become
    /// file entries, the rest recurse into subdirectory trees.
    pub fn build<'e>(entries: impl Iterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for entry in entries {
            let parents = entry.parent_dirs();
            root.add_entry(&parents, entry)?;
        }

        Ok(root)
    }

    /// Traverse the tree depth-first, calling a function on each node
    ///
    /// Children are visited before parents (post-order), so child object ids
    /// are storable before the parent tree that references them.
    pub fn traverse<F>(&self, func: &F) -> anyhow::Result<()>
    where
        F: Fn(&Tree) -> anyhow::Result<()>,
    {
        for entry in self.writeable_entries.values() {
            if let TreeEntry::Directory(tree) = entry {
                tree.traverse(func)?;
            }
        }
        func(self)?;

        Ok(())
    }

    fn add_entry(&mut self, parents: &[String], entry: &IndexEntry) -> anyhow::Result<()> {
        if parents.is_empty() {
            self.writeable_entries
                .insert(entry.basename()?.to_string(), TreeEntry::File(entry.clone()));
            return Ok(());
        }

        let segment = &parents[0];
        let subtree = match self
            .writeable_entries
            .entry(segment.clone())
            .or_insert_with(|| TreeEntry::Directory(Tree::default()))
        {
            TreeEntry::Directory(tree) => tree,
            TreeEntry::File(_) => {
                anyhow::bail!("path component '{}' is both a file and a directory", segment)
            }
        };
        subtree.add_entry(&parents[1..], entry)?;

        Ok(())
    }

    /// Entries of a tree parsed from the database, sorted by name
    pub fn entries(&self) -> impl Iterator<Item = (&String, &DatabaseEntry)> {
        self.readable_entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, DatabaseEntry)> {
        self.readable_entries.into_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.readable_entries.is_empty() && self.writeable_entries.is_empty()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        // BTreeMap iteration yields names in ascending byte-wise order,
        // which is exactly the canonical entry order.
        let mut content = Vec::new();

        for (name, tree_entry) in &self.writeable_entries {
            content.extend_from_slice(tree_entry.mode().as_str().as_bytes());
            content.push(b' ');
            content.extend_from_slice(name.as_bytes());
            content.push(0);
            tree_entry.oid()?.write_raw_to(&mut content)?;
        }

        Ok(frame(self.object_type(), &content))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();
        let mut reader = reader;

        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(anyhow::anyhow!("unexpected EOF in tree entry mode"));
            }

            let mode = EntryMode::try_from(std::str::from_utf8(&mode_bytes)?)?;

            name_bytes.clear();
            let n = reader.read_until(b'\0', &mut name_bytes)?;
            if n == 0 || name_bytes.pop() != Some(b'\0') {
                return Err(anyhow::anyhow!("unexpected EOF in tree entry name"));
            }
            let name = std::str::from_utf8(&name_bytes)?.to_owned();

            let oid = ObjectId::read_raw_from(&mut reader)
                .context("unexpected EOF in tree entry object id")?;

            entries.insert(name, DatabaseEntry::new(oid, mode));
        }

        Ok(Tree {
            readable_entries: entries,
            writeable_entries: Default::default(),
        })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.readable_entries
            .iter()
            .map(|(name, entry)| {
                let object_type = match entry.mode {
                    EntryMode::Directory => ObjectType::Tree,
                    _ => ObjectType::Blob,
                };

                format!(
                    "{} {} {}\t{}",
                    entry.mode.as_str(),
                    object_type.as_str(),
                    entry.oid.as_ref(),
                    name
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}
