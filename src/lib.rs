//! Gel: a content-addressed version control engine
//!
//! Objects are hashed with SHA-256 and stored zlib-compressed under `.gel`.
//! The staging area uses the DIRC binary format; trees are built from it and
//! anchored into history by commits and refs.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;
