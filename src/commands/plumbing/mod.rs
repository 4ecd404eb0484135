//! Plumbing commands
//!
//! - `hash-object`, `cat-file`: single objects
//! - `ls-files`, `write-tree`, `read-tree`: the index and the trees built from it
//! - `ls-tree`: tree listings
//! - `commit-tree`: commit objects from an explicit tree
//! - `symbolic-ref`, `update-ref`, `rev-parse`: refs and revisions

pub mod cat_file;
pub mod commit_tree;
pub mod hash_object;
pub mod ls_files;
pub mod ls_tree;
pub mod read_tree;
pub mod rev_parse;
pub mod symbolic_ref;
pub mod update_ref;
pub mod write_tree;
