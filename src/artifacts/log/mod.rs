//! Commit history traversal
//!
//! `RevList` walks every parent of every commit it reaches, ordered by a
//! priority queue on committer time, so merges list both sides of history
//! interleaved the way they were made.

pub mod rev_list;
