//! Object types and operations
//!
//! All content is stored as objects identified by SHA-256 hashes:
//!
//! - **Blob**: file content (raw bytes)
//! - **Tree**: directory listing (modes, names and object IDs)
//! - **Commit**: snapshot with metadata (tree, parents, identities, message)
//!
//! Every object shares the envelope `<type> <size>\0<content>`, and the object
//! ID is the hash of the whole envelope.

pub mod blob;
pub mod commit;
pub mod file_mode;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-256 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 64;

/// Length of a SHA-256 hash in raw bytes
pub const OBJECT_ID_BYTES: usize = 32;
