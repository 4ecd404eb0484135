use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::{GelError, Result};
use byteorder::{ByteOrder, NetworkEndian, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub signature: [u8; 4],
    pub version: u32,
    pub entries_count: u32,
}

impl Packable for IndexHeader {
    fn serialize(&self) -> Result<Bytes> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        let write = |bytes: &mut Vec<u8>| -> std::io::Result<()> {
            bytes.write_all(&self.signature)?;
            bytes.write_u32::<NetworkEndian>(self.version)?;
            bytes.write_u32::<NetworkEndian>(self.entries_count)
        };
        write(&mut bytes).map_err(|e| GelError::io("<index header>", e))?;

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for IndexHeader {
    /// Signature is checked before anything else; version comes second.
    fn deserialize(bytes: Bytes) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(GelError::TruncatedIndex("header is shorter than 12 bytes".into()));
        }

        let mut signature = [0u8; 4];
        signature.copy_from_slice(&bytes[0..4]);
        if signature != SIGNATURE {
            return Err(GelError::InvalidIndexSignature(signature));
        }

        let version = NetworkEndian::read_u32(&bytes[4..8]);
        if version != VERSION {
            return Err(GelError::UnsupportedIndexVersion(version));
        }

        let entries_count = NetworkEndian::read_u32(&bytes[8..12]);

        Ok(IndexHeader {
            signature,
            version,
            entries_count,
        })
    }
}
