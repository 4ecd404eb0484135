//! Bridge between the flat staging view and tree objects
//!
//! - `builder`: index entries to a graph of tree objects (write-tree)
//! - `walker`: tree objects back to paths (read-tree, ls-tree, diff, status)

pub mod builder;
pub mod walker;
