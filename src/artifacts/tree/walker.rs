//! Depth-first expansion of tree objects into paths
//!
//! | options                       | yields                                   |
//! |-------------------------------|------------------------------------------|
//! | default (not recursive)       | blobs directly in the tree               |
//! | `include_trees`               | immediate entries, trees included        |
//! | `recursive`                   | every leaf, no trees                     |
//! | `recursive` + `include_trees` | every tree and leaf, tree before content |
//! | `only_trees`                  | trees only, at whatever depth is walked  |

use crate::areas::database::Database;
use crate::artifacts::database::database_entry::{DatabaseEntry, PathMap};
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::file_mode::FileMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::TreeEntry;
use crate::errors::{GelError, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    pub recursive: bool,
    pub include_trees: bool,
    pub only_trees: bool,
}

impl WalkOptions {
    /// Every leaf below the root, the shape path maps are built from
    pub fn leaves() -> Self {
        WalkOptions {
            recursive: true,
            ..Default::default()
        }
    }
}

#[derive(Debug)]
pub struct TreeWalker<'d> {
    database: &'d Database,
}

impl<'d> TreeWalker<'d> {
    pub fn new(database: &'d Database) -> Self {
        TreeWalker { database }
    }

    /// Call `visit(path, entry)` for every entry selected by `options`.
    pub fn walk<F>(&self, oid: &ObjectId, options: WalkOptions, visit: &mut F) -> Result<()>
    where
        F: FnMut(&str, &TreeEntry) -> Result<()>,
    {
        self.walk_under(oid, "", options, visit)
    }

    fn walk_under<F>(&self, oid: &ObjectId, prefix: &str, options: WalkOptions, visit: &mut F) -> Result<()>
    where
        F: FnMut(&str, &TreeEntry) -> Result<()>,
    {
        let tree = self.database.load_tree(oid)?;

        for entry in tree.entries() {
            let path = join(prefix, &entry.name);

            if entry.is_tree() {
                if options.include_trees || options.only_trees {
                    visit(&path, entry)?;
                }
                if options.recursive {
                    self.walk_under(&entry.oid, &path, options, visit)?;
                }
            } else if !options.only_trees {
                visit(&path, entry)?;
            }
        }

        Ok(())
    }

    /// Leaves of a tree keyed by full path
    pub fn flatten(&self, oid: &ObjectId) -> Result<PathMap> {
        let mut paths = PathMap::new();
        self.walk(oid, WalkOptions::leaves(), &mut |path, entry| {
            paths.insert(path.to_string(), DatabaseEntry::new(entry.oid, entry.mode));
            Ok(())
        })?;

        Ok(paths)
    }

    /// Index entries for every leaf, with zeroed stat data
    pub fn read_tree(&self, oid: &ObjectId) -> Result<Vec<IndexEntry>> {
        Ok(self
            .flatten(oid)?
            .into_iter()
            .map(|(path, entry)| IndexEntry::from_tree(path, entry.oid, entry.mode))
            .collect())
    }

    /// Find one `/`-separated path inside a tree. The empty path is the root.
    pub fn lookup_path(&self, root: &ObjectId, path: &str) -> Result<DatabaseEntry> {
        let not_found = || GelError::PathNotInTree {
            tree: root.to_hex(),
            path: PathBuf::from(path),
        };

        let mut current = DatabaseEntry::new(*root, FileMode::Directory);
        for component in path.split('/').filter(|c| !c.is_empty()) {
            if !current.is_tree() {
                return Err(not_found());
            }
            let tree = self.database.load_tree(&current.oid)?;
            let entry = tree.get(component).ok_or_else(not_found)?;
            current = DatabaseEntry::new(entry.oid, entry.mode);
        }

        Ok(current)
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}
