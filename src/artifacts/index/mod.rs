//! Index file format
//!
//! The index (staging area) records the flat path -> (hash, metadata) view that
//! the next commit will snapshot.
//!
//! ## File Format (Version 2, big-endian)
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC" (4 bytes)
//!   - Version: 2 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - 74 bytes of metadata, hash and flags, then the NUL-terminated path
//!   - Each entry padded with NULs to a multiple of 8 bytes
//!
//! Checksum (32 bytes):
//!   - SHA-256 hash of all preceding bytes
//! ```

pub mod checksum;
pub mod entry_flags;
pub mod index_entry;
pub mod index_header;

/// Size of SHA-256 checksum in bytes
pub const CHECKSUM_SIZE: usize = 32;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 12; // 4 bytes for signature, 4 for version, 4 for entries_count

/// Magic signature identifying index files
pub const SIGNATURE: [u8; 4] = *b"DIRC";

/// Index file format version
pub const VERSION: u32 = 2;
