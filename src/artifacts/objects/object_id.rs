//! Object identifier (SHA-256 digest)
//!
//! Object ids are 64-character lowercase hexadecimal strings representing
//! SHA-256 digests. They uniquely identify all objects in the database
//! (blobs, trees, commits).
//!
//! ## Format
//!
//! - Full: 64 hex characters
//! - Short: first 7 characters (for display)
//! - Binary: 32 raw bytes (inside tree entries)
//!
//! ## Storage
//!
//! Objects are stored in `.kit/objects/<first-2-chars>/<remaining-62-chars>`

use crate::artifacts::objects::{OBJECT_ID_LENGTH, OBJECT_ID_RAW_LENGTH};
use std::io;
use std::path::PathBuf;

/// Object identifier (SHA-256 digest)
///
/// A 64-character lowercase hexadecimal string that uniquely identifies an
/// object. Implements parsing, binary (de)serialization, and path conversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object id from a string
    ///
    /// The id must be exactly 64 lowercase hexadecimal characters.
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("invalid object id length: {}", id.len()));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        {
            return Err(anyhow::anyhow!("invalid object id characters: {}", id));
        }
        Ok(Self(id))
    }

    /// Build an object id from a raw 32-byte digest
    pub fn from_raw(bytes: &[u8; OBJECT_ID_RAW_LENGTH]) -> Self {
        let mut hex = String::with_capacity(OBJECT_ID_LENGTH);
        for byte in bytes {
            hex.push_str(&format!("{:02x}", byte));
        }
        Self(hex)
    }

    /// Write the object id in binary form (32 bytes)
    ///
    /// Used when serializing tree entries.
    pub fn write_raw_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        for i in (0..OBJECT_ID_LENGTH).step_by(2) {
            let byte = u8::from_str_radix(&self.0[i..i + 2], 16)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "invalid hex digit"))?;
            writer.write_all(&[byte])?;
        }

        Ok(())
    }

    /// Read an object id from binary form (32 bytes)
    ///
    /// Used when deserializing tree entries.
    pub fn read_raw_from<R: io::Read + ?Sized>(reader: &mut R) -> anyhow::Result<Self> {
        let mut buffer = [0u8; OBJECT_ID_RAW_LENGTH];
        reader.read_exact(&mut buffer)?;

        Ok(Self::from_raw(&buffer))
    }

    /// Convert to the fan-out path for object storage
    ///
    /// Splits the digest as `xx/yyyy...` where `xx` is the first two chars,
    /// keeping single-directory cardinality bounded.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// Abbreviated form for display (first 7 characters)
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
