//! Core object traits and framing
//!
//! This module defines the framed envelope shared by all objects and the
//! traits every object type implements:
//! - `Packable`: serialization to the framed binary format
//! - `Unpackable`: deserialization from the framed binary format
//! - `Object`: common object operations (id computation, display)
//!
//! ## Object format
//!
//! All objects are stored as:
//! ```text
//! <type> <size>\0<content>
//! ```
//! where `<size>` is the decimal byte length of `<content>`. The object id
//! is the SHA-256 digest of this framed buffer; the on-disk representation
//! is the framed buffer compressed with zlib.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Result;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::io::BufRead;
use std::path::PathBuf;

/// Wrap raw content bytes in the framed envelope for the given type.
pub fn frame(object_type: ObjectType, content: &[u8]) -> Bytes {
    let mut framed = Vec::with_capacity(content.len() + 16);
    framed.extend_from_slice(object_type.as_str().as_bytes());
    framed.extend_from_slice(format!(" {}\0", content.len()).as_bytes());
    framed.extend_from_slice(content);

    Bytes::from(framed)
}

/// Frame content bytes and compute their object id in one pass.
///
/// Returns both the id and the framed buffer so the caller can hand the
/// buffer straight to the database without recomputation.
pub fn hash_framed(object_type: ObjectType, content: &[u8]) -> (ObjectId, Bytes) {
    let framed = frame(object_type, content);
    let oid = digest_of(&framed);

    (oid, framed)
}

/// SHA-256 digest of an already-framed buffer
pub fn digest_of(framed: &[u8]) -> ObjectId {
    let mut hasher = Sha256::new();
    hasher.update(framed);
    let digest: [u8; 32] = hasher.finalize().into();

    ObjectId::from_raw(&digest)
}

/// Trait for serializing objects to the framed binary format
pub trait Packable {
    /// Serialize the object to bytes (including the framed header)
    fn serialize(&self) -> Result<Bytes>;
}

/// Trait for deserializing objects from the framed binary format
pub trait Unpackable {
    /// Deserialize the object from a reader (header already consumed)
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

/// Core object trait
///
/// Implemented by all object types (Blob, Tree, Commit).
pub trait Object: Packable {
    /// Get the object's type
    fn object_type(&self) -> ObjectType;

    /// Get a human-readable representation
    fn display(&self) -> String;

    /// Compute the object id (SHA-256 of the framed buffer)
    fn object_id(&self) -> Result<ObjectId> {
        Ok(digest_of(&self.serialize()?))
    }

    /// Get the fan-out path where this object would be stored
    fn object_path(&self) -> Result<PathBuf> {
        Ok(self.object_id()?.to_path())
    }
}

/// Type-erased object container
///
/// Used when the specific object type isn't known at compile time, e.g.
/// when pretty-printing an arbitrary object by id.
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

impl ObjectBox {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(_) => ObjectType::Blob,
            ObjectBox::Tree(_) => ObjectType::Tree,
            ObjectBox::Commit(_) => ObjectType::Commit,
        }
    }

    pub fn display(&self) -> String {
        match self {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
        }
    }
}
