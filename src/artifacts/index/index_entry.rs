//! Index entry representation
//!
//! Each entry records one tracked file:
//! - File path, relative to the repository root, `/`-separated
//! - Content hash (object ID)
//! - Stat data used for change detection without re-hashing content
//!
//! ## Entry Format
//!
//! ```text
//! ctime(4) ctime_nsec(4) mtime(4) mtime_nsec(4)
//! dev(4) ino(4) mode(4) uid(4) gid(4) size(4)
//! oid(32 raw bytes) flags(2) path NUL padding
//! ```
//!
//! The whole entry is NUL-padded to a multiple of 8 bytes, with at least one
//! NUL after the path. Decoders recover the entry length from the path length
//! stored in the flags.

use crate::artifacts::index::entry_flags::EntryFlags;
use crate::artifacts::objects::file_mode::FileMode;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GelError, Result};
use byteorder::{ByteOrder, NetworkEndian, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use is_executable::IsExecutable;
use std::fs::Metadata;
use std::io::Write;
use std::os::unix::prelude::MetadataExt;
use std::path::Path;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Bytes before the path: ten u32 stat fields, the raw hash and the flags
pub const ENTRY_FIXED_SIZE: usize = 74;

/// Total on-disk size of an entry whose path is `path_len` bytes long
pub fn padded_entry_size(path_len: usize) -> usize {
    (ENTRY_FIXED_SIZE + path_len + 1).div_ceil(ENTRY_BLOCK) * ENTRY_BLOCK
}

/// Index entry representing a tracked file
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    /// Path relative to repository root
    pub path: String,
    pub oid: ObjectId,
    pub metadata: EntryMetadata,
    pub flags: EntryFlags,
}

impl IndexEntry {
    /// Build a stage-0 entry from a path, its blob and its stat data.
    pub fn from_stat(path: impl Into<String>, oid: ObjectId, metadata: EntryMetadata) -> Self {
        let path = path.into();
        let flags = EntryFlags::for_path(&path, 0);

        IndexEntry {
            path,
            oid,
            metadata,
            flags,
        }
    }

    /// Entry with zeroed provenance, as produced when reading a tree back
    pub fn from_tree(path: impl Into<String>, oid: ObjectId, mode: FileMode) -> Self {
        Self::from_stat(
            path,
            oid,
            EntryMetadata {
                mode,
                ..Default::default()
            },
        )
    }

    pub fn mode(&self) -> FileMode {
        self.metadata.mode
    }

    pub fn stage(&self) -> u8 {
        self.flags.stage()
    }

    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Every ancestor directory, outermost first: `a/b/c` gives `a`, `a/b`.
    pub fn parent_dirs(&self) -> Vec<&str> {
        self.path
            .match_indices('/')
            .map(|(at, _)| &self.path[..at])
            .collect()
    }

    /// Size and mode agree with the given stat data
    pub fn stat_match(&self, other: &EntryMetadata) -> bool {
        (self.metadata.size == 0 || self.metadata.size == other.size)
            && self.metadata.mode == other.mode
    }

    pub fn times_match(&self, other: &EntryMetadata) -> bool {
        self.metadata.ctime == other.ctime
            && self.metadata.ctime_nsec == other.ctime_nsec
            && self.metadata.mtime == other.mtime
            && self.metadata.mtime_nsec == other.mtime_nsec
    }
}

/// File metadata stored in index entries
///
/// Every field is written as a 32-bit big-endian integer; wider values from
/// the filesystem are truncated, matching what the format can hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub ctime: u32,
    pub ctime_nsec: u32,
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode: FileMode,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
}

impl TryFrom<(&Path, &Metadata)> for EntryMetadata {
    type Error = GelError;

    fn try_from((file_path, metadata): (&Path, &Metadata)) -> Result<Self> {
        let mode = if metadata.file_type().is_symlink() {
            FileMode::Symlink
        } else if metadata.is_dir() {
            return Err(GelError::InvalidPath(format!(
                "{} is a directory",
                file_path.display()
            )));
        } else if file_path.is_executable() {
            FileMode::Executable
        } else {
            FileMode::Regular
        };

        Ok(Self {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode,
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32,
        })
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> Result<Bytes> {
        let mut entry_bytes = Vec::with_capacity(padded_entry_size(self.path.len()));
        let meta = &self.metadata;

        let write = |out: &mut Vec<u8>| -> std::io::Result<()> {
            for field in [
                meta.ctime,
                meta.ctime_nsec,
                meta.mtime,
                meta.mtime_nsec,
                meta.dev,
                meta.ino,
                meta.mode.as_u32(),
                meta.uid,
                meta.gid,
                meta.size,
            ] {
                out.write_u32::<NetworkEndian>(field)?;
            }
            self.oid.write_raw_to(out)?;
            out.write_u16::<NetworkEndian>(self.flags.bits())?;
            out.write_all(self.path.as_bytes())
        };
        write(&mut entry_bytes).map_err(|e| GelError::io(&self.path, e))?;

        // at least one NUL, then pad to the block size
        entry_bytes.push(0);
        while entry_bytes.len() % ENTRY_BLOCK != 0 {
            entry_bytes.push(0);
        }

        Ok(Bytes::from(entry_bytes))
    }
}

impl Unpackable for IndexEntry {
    /// Decode exactly one padded entry.
    fn deserialize(bytes: Bytes) -> Result<Self> {
        if bytes.len() < ENTRY_FIXED_SIZE + 1 {
            return Err(GelError::TruncatedIndex(format!(
                "entry is only {} bytes long",
                bytes.len()
            )));
        }

        let field = |n: usize| NetworkEndian::read_u32(&bytes[n * 4..n * 4 + 4]);
        let mode = FileMode::try_from(field(6))?;
        let oid = ObjectId::from_raw(&bytes[40..72])?;
        let flags = EntryFlags::from_bits_retain(NetworkEndian::read_u16(&bytes[72..74]));

        let name = &bytes[ENTRY_FIXED_SIZE..];
        let name_end = name
            .iter()
            .position(|&b| b == 0)
            .ok_or(GelError::UnterminatedPath)?;
        let path = std::str::from_utf8(&name[..name_end])
            .map_err(|_| GelError::InvalidPath("index path is not UTF-8".into()))?
            .to_string();

        Ok(IndexEntry {
            path,
            oid,
            metadata: EntryMetadata {
                ctime: field(0),
                ctime_nsec: field(1),
                mtime: field(2),
                mtime_nsec: field(3),
                dev: field(4),
                ino: field(5),
                mode,
                uid: field(7),
                gid: field(8),
                size: field(9),
            },
            flags,
        })
    }
}
