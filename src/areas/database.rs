//! Content-addressed object database
//!
//! The database stores all objects (blobs, trees, commits) keyed by the
//! SHA-256 digest of their framed representation. Objects are immutable and
//! append-only: a digest that exists on disk is never rewritten, which is
//! the sole deduplication mechanism.
//!
//! ## Storage format
//!
//! - Path: `.kit/objects/ab/cdef123...` (first 2 hex chars as directory)
//! - Content: zlib-compressed framed buffer `<type> <size>\0<content>`
//!
//! Writes go to a temporary sibling and are renamed into place, so a crash
//! leaves either no file or a complete valid one.

use crate::artifacts::core::errors::EngineError;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable, digest_of};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Maximum tree nesting depth tolerated while flattening
const MAX_TREE_DEPTH: usize = 1_000;

/// Object database
///
/// Manages storage and retrieval of content-addressed objects.
#[derive(Debug)]
pub struct Database {
    /// Path to the objects directory (typically `.kit/objects`)
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store an object, returning its id
    ///
    /// The object is serialized and written to the path derived from its
    /// digest. If that file already exists the call is a no-op.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let framed = object.serialize()?;
        let oid = digest_of(&framed);

        self.store_framed(&oid, framed)?;

        Ok(oid)
    }

    /// Store an already-framed buffer under a precomputed digest
    pub fn store_framed(&self, oid: &ObjectId, framed: Bytes) -> anyhow::Result<()> {
        let object_path = self.path.join(oid.to_path());

        if object_path.exists() {
            trace!(oid = %oid, "object already stored, skipping write");
            return Ok(());
        }

        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("invalid object path {}", object_path.display()))?,
        )
        .context(format!(
            "unable to create object directory for {}",
            object_path.display()
        ))?;

        self.write_object(object_path, framed)?;
        debug!(oid = %oid, "stored object");

        Ok(())
    }

    /// Check whether an object exists without reading it
    pub fn exists(&self, oid: &ObjectId) -> bool {
        self.path.join(oid.to_path()).exists()
    }

    /// Load the raw framed bytes of an object (decompressed, header included)
    pub fn load(&self, oid: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(oid.to_path());

        if !object_path.exists() {
            return Err(EngineError::NotFound(oid.to_string()).into());
        }

        let compressed = std::fs::read(&object_path).context(format!(
            "unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(compressed.into())
            .map_err(|_| EngineError::Corrupted(oid.to_string()).into())
    }

    /// Read an object's type and content, validating the framed header
    ///
    /// Fails `NotFound` if the backing file is missing and `Corrupted` if
    /// the header is malformed or the declared size disagrees with the
    /// actual content length.
    pub fn read(&self, oid: &ObjectId) -> anyhow::Result<(ObjectType, Bytes)> {
        let framed = self.load(oid)?;
        let mut reader = Cursor::new(&framed[..]);

        let (object_type, size) = ObjectType::parse_header(&mut reader)
            .map_err(|_| EngineError::Corrupted(oid.to_string()))?;

        let content = framed.slice(reader.position() as usize..);
        if content.len() != size {
            return Err(EngineError::Corrupted(oid.to_string()).into());
        }

        Ok((object_type, content))
    }

    /// Parse an object into the appropriate type
    pub fn parse_object(&self, oid: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, content) = self.read(oid)?;
        let reader = Cursor::new(content);

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(reader)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(reader)?))),
        }
    }

    /// Parse an object as a blob, if it is one
    pub fn parse_object_as_blob(&self, oid: &ObjectId) -> anyhow::Result<Option<Blob>> {
        let (object_type, content) = self.read(oid)?;

        match object_type {
            ObjectType::Blob => Ok(Some(Blob::deserialize(Cursor::new(content))?)),
            _ => Ok(None),
        }
    }

    /// Parse an object as a tree, if it is one
    pub fn parse_object_as_tree(&self, oid: &ObjectId) -> anyhow::Result<Option<Tree>> {
        let (object_type, content) = self.read(oid)?;

        match object_type {
            ObjectType::Tree => Ok(Some(Tree::deserialize(Cursor::new(content))?)),
            _ => Ok(None),
        }
    }

    /// Parse an object as a commit, if it is one
    pub fn parse_object_as_commit(&self, oid: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let (object_type, content) = self.read(oid)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(Cursor::new(content))?)),
            _ => Ok(None),
        }
    }

    /// Load a commit, failing if the object is missing or not a commit
    pub fn load_commit(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        self.parse_object_as_commit(oid)?
            .ok_or_else(|| anyhow::anyhow!("object {} is not a commit", oid))
    }

    /// Flatten a commit's tree into a `path -> entry` map
    pub fn flatten_commit_tree(
        &self,
        commit_oid: &ObjectId,
    ) -> anyhow::Result<BTreeMap<PathBuf, DatabaseEntry>> {
        let commit = self.load_commit(commit_oid)?;
        self.flatten_tree(commit.tree_oid())
    }

    /// Flatten a tree into a `path -> entry` map by recursive descent
    ///
    /// Directory entries recurse with the path prefix extended by the entry
    /// name; file entries land in the map as `full_path -> {oid, mode}`.
    pub fn flatten_tree(
        &self,
        tree_oid: &ObjectId,
    ) -> anyhow::Result<BTreeMap<PathBuf, DatabaseEntry>> {
        let mut flat = BTreeMap::new();
        self.flatten_tree_into(tree_oid, PathBuf::new(), &mut flat, 0)?;

        Ok(flat)
    }

    fn flatten_tree_into(
        &self,
        tree_oid: &ObjectId,
        prefix: PathBuf,
        flat: &mut BTreeMap<PathBuf, DatabaseEntry>,
        depth: usize,
    ) -> anyhow::Result<()> {
        if depth > MAX_TREE_DEPTH {
            return Err(EngineError::TooDeep(MAX_TREE_DEPTH).into());
        }

        let tree = self
            .parse_object_as_tree(tree_oid)?
            .ok_or_else(|| anyhow::anyhow!("object {} is not a tree", tree_oid))?;

        for (name, entry) in tree.into_entries() {
            let path = prefix.join(&name);

            if entry.mode.is_tree() {
                self.flatten_tree_into(&entry.oid, path, flat, depth + 1)?;
            } else {
                flat.insert(path, entry);
            }
        }

        Ok(())
    }

    fn write_object(&self, object_path: PathBuf, framed: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let compressed = Self::compress(framed)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&compressed).context(format!(
            "unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file into place to make the write atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed| compressed.into())
            .context("unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .context("unable to decompress object content")?;

        Ok(decompressed.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
