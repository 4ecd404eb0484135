//! Stateful areas of a repository
//!
//! - `database`: content-addressed object store
//! - `index`: the staging file
//! - `refs`: HEAD and branch refs
//! - `workspace`: working directory I/O
//! - `repository`: owner of all of the above, plus the engine operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
