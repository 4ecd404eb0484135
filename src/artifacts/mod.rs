//! Data structures and algorithms
//!
//! - `branch`: branch names and revision expressions
//! - `checkout`: switch migrations and conflict detection
//! - `database`: flat tree entries and path maps
//! - `diff`: Myers line diff, hunks and path-map diff
//! - `index`: staging file entries, header and checksum
//! - `log`: commit history traversal
//! - `objects`: blob, tree and commit objects
//! - `status`: HEAD, index and workspace comparison
//! - `tree`: tree building and walking

pub mod branch;
pub mod checkout;
pub mod database;
pub mod diff;
pub mod index;
pub mod log;
pub mod objects;
pub mod status;
pub mod tree;
