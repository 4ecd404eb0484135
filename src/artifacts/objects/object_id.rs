//! Object identifier (SHA-256 hash)
//!
//! Object IDs are 64-character hexadecimal strings on the outside and 32 raw
//! bytes inside tree objects and index entries.
//!
//! ## Storage
//!
//! Objects are stored in `.gel/objects/<first-2-chars>/<remaining-62-chars>`

use crate::artifacts::objects::{OBJECT_ID_BYTES, OBJECT_ID_LENGTH};
use crate::errors::{GelError, Result};
use sha2::{Digest, Sha256};
use std::io;
use std::path::PathBuf;

/// Object identifier (SHA-256 hash)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_BYTES]);

impl ObjectId {
    /// Parse and validate a 64-character hexadecimal object ID
    pub fn try_parse(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref();
        if id.len() != OBJECT_ID_LENGTH {
            return Err(GelError::InvalidObjectId(format!(
                "expected {} hex characters, got {}",
                OBJECT_ID_LENGTH,
                id.len()
            )));
        }

        let mut raw = [0u8; OBJECT_ID_BYTES];
        hex::decode_to_slice(id, &mut raw)
            .map_err(|_| GelError::InvalidObjectId(id.to_string()))?;

        Ok(Self(raw))
    }

    pub fn from_raw(raw: &[u8]) -> Result<Self> {
        let raw: [u8; OBJECT_ID_BYTES] = raw.try_into().map_err(|_| {
            GelError::InvalidObjectId(format!(
                "expected {} raw bytes, got {}",
                OBJECT_ID_BYTES,
                raw.len()
            ))
        })?;

        Ok(Self(raw))
    }

    /// Hash arbitrary bytes; callers pass the full object envelope.
    pub fn hash(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        Self(digest.into())
    }

    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_BYTES] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Write the object ID in binary format (32 bytes)
    pub fn write_raw_to<W: io::Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.0)
    }

    /// Read an object ID from binary format (32 bytes)
    pub fn read_raw_from<R: io::Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
        let mut raw = [0u8; OBJECT_ID_BYTES];
        reader.read_exact(&mut raw)?;
        Ok(Self(raw))
    }

    /// Convert to file system path for object storage
    ///
    /// `abc123...` becomes `ab/c123...`
    pub fn to_path(&self) -> PathBuf {
        let hex = self.to_hex();
        let (dir, file) = hex.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash
    pub fn to_short_oid(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(7);
        hex
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl std::str::FromStr for ObjectId {
    type Err = GelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_parse(s)
    }
}
