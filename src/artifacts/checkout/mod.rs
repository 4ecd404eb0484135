//! Branch switching
//!
//! Switching computes the path-level difference between the current and the
//! target commit, checks that no local work would be lost, then rewrites the
//! working directory and finally the index.

pub mod conflict;
pub mod migration;
