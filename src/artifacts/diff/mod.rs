//! Diff algorithms and snapshot comparison
//!
//! - `myers`: shortest edit script between two line sequences
//! - `hunk`: groups an edit script into context-padded hunks
//! - `tree_diff`: which paths changed between two path maps
//! - `diff_target`: one side of a printed file diff

pub mod diff_target;
pub mod hunk;
pub mod myers;
pub mod tree_diff;
