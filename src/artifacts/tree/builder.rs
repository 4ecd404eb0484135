//! Tree construction from index entries
//!
//! Paths are split on `/` into an arena of directory nodes. Every node is
//! created after its parent, so walking the arena from the last node back to
//! the root writes each subtree before the tree that points at it.

use crate::areas::database::Database;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::file_mode::FileMode;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use crate::errors::{GelError, Result};
use std::collections::BTreeMap;
use tracing::debug;

const ROOT: usize = 0;

/// Result of writing a tree graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOutcome {
    pub root: ObjectId,
    /// Tree objects that were not in the store before this build
    pub written: usize,
}

#[derive(Debug, Default)]
struct DirNode {
    dirs: BTreeMap<String, usize>,
    files: BTreeMap<String, TreeEntry>,
}

#[derive(Debug)]
pub struct TreeBuilder<'d> {
    database: &'d Database,
}

impl<'d> TreeBuilder<'d> {
    pub fn new(database: &'d Database) -> Self {
        TreeBuilder { database }
    }

    /// Write every tree needed to snapshot `entries` and return the root.
    pub fn build<'e>(&self, entries: impl IntoIterator<Item = &'e IndexEntry>) -> Result<BuildOutcome> {
        let nodes = Self::arrange(entries)?;
        let mut oids: Vec<Option<ObjectId>> = vec![None; nodes.len()];
        let mut written = 0;

        for id in (0..nodes.len()).rev() {
            let node = &nodes[id];
            let mut tree_entries: Vec<TreeEntry> = node.files.values().cloned().collect();
            for (name, &child) in &node.dirs {
                let child_oid = oids[child].ok_or_else(|| {
                    GelError::InvalidPath(format!("subtree {name} was not built before its parent"))
                })?;
                tree_entries.push(TreeEntry::new(FileMode::Directory, child_oid, name.clone()));
            }

            let tree = Tree::new(tree_entries);
            let envelope = tree.envelope()?;
            let oid = ObjectId::hash(&envelope);
            if self.database.write_object(&oid, &envelope)? {
                written += 1;
            }
            oids[id] = Some(oid);
        }

        let root = oids[ROOT].ok_or_else(|| GelError::InvalidPath("empty tree arena".into()))?;
        debug!(%root, written, "built tree");

        Ok(BuildOutcome { root, written })
    }

    fn arrange<'e>(entries: impl IntoIterator<Item = &'e IndexEntry>) -> Result<Vec<DirNode>> {
        let mut nodes = vec![DirNode::default()];

        for entry in entries {
            let components: Vec<&str> = entry.path.split('/').collect();
            if components
                .iter()
                .any(|c| c.is_empty() || *c == "." || *c == "..")
            {
                return Err(GelError::InvalidPath(entry.path.clone()));
            }

            let Some((file_name, dirs)) = components.split_last() else {
                return Err(GelError::InvalidPath(entry.path.clone()));
            };

            let mut current = ROOT;
            for dir in dirs {
                if nodes[current].files.contains_key(*dir) {
                    return Err(GelError::InvalidPath(format!(
                        "{} is both a file and a directory",
                        dir
                    )));
                }
                current = match nodes[current].dirs.get(*dir) {
                    Some(&child) => child,
                    None => {
                        nodes.push(DirNode::default());
                        let child = nodes.len() - 1;
                        nodes[current].dirs.insert(dir.to_string(), child);
                        child
                    }
                };
            }

            if nodes[current].dirs.contains_key(*file_name) {
                return Err(GelError::InvalidPath(format!(
                    "{} is both a file and a directory",
                    entry.path
                )));
            }
            nodes[current].files.insert(
                file_name.to_string(),
                TreeEntry::new(entry.mode(), entry.oid, file_name.to_string()),
            );
        }

        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::wrap_envelope;
    use crate::artifacts::objects::object_type::ObjectType;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dir() -> TempDir {
        TempDir::new().unwrap()
    }

    fn entry(path: &str) -> IndexEntry {
        IndexEntry::from_tree(path, ObjectId::hash(path.as_bytes()), FileMode::Regular)
    }

    fn names(tree: &Tree) -> Vec<&str> {
        tree.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[rstest]
    fn builds_nested_subtree(dir: TempDir) {
        let database = Database::new(dir.path());
        let entries = [entry("a.txt"), entry("b/c.txt")];

        let outcome = TreeBuilder::new(&database).build(&entries).unwrap();
        let root = database.load_tree(&outcome.root).unwrap();

        assert_eq!(names(&root), vec!["a.txt", "b"]);
        assert_eq!(root.entries()[0].mode, FileMode::Regular);
        assert_eq!(root.entries()[1].mode, FileMode::Directory);

        let subtree = database.load_tree(&root.entries()[1].oid).unwrap();
        assert_eq!(names(&subtree), vec!["c.txt"]);
        assert_eq!(subtree.entries()[0].oid, entries[1].oid);
    }

    #[rstest]
    fn directories_sort_as_if_suffixed_with_slash(dir: TempDir) {
        let database = Database::new(dir.path());
        let entries = [entry("lib/mod.rs"), entry("lib.go"), entry("lib0")];

        let outcome = TreeBuilder::new(&database).build(&entries).unwrap();
        let root = database.load_tree(&outcome.root).unwrap();

        assert_eq!(names(&root), vec!["lib.go", "lib", "lib0"]);
    }

    #[rstest]
    fn rebuilding_writes_nothing(dir: TempDir) {
        let database = Database::new(dir.path());
        let entries = [entry("a.txt"), entry("b/c.txt"), entry("b/d/e.txt")];
        let builder = TreeBuilder::new(&database);

        let first = builder.build(&entries).unwrap();
        let second = builder.build(&entries).unwrap();

        assert_eq!(first.written, 3);
        assert_eq!(second.written, 0);
        assert_eq!(first.root, second.root);
    }

    #[rstest]
    fn empty_index_builds_the_empty_tree(dir: TempDir) {
        let database = Database::new(dir.path());

        let outcome = TreeBuilder::new(&database).build(&Vec::<IndexEntry>::new()).unwrap();

        assert_eq!(outcome.root, ObjectId::hash(&wrap_envelope(ObjectType::Tree, b"")));
        assert!(database.load_tree(&outcome.root).unwrap().is_empty());
    }

    #[rstest]
    #[case("a//b")]
    #[case("a/./b")]
    #[case("../escape")]
    fn rejects_unnormalized_paths(dir: TempDir, #[case] path: &str) {
        let database = Database::new(dir.path());

        assert!(matches!(
            TreeBuilder::new(&database).build(&[entry(path)]),
            Err(GelError::InvalidPath(_))
        ));
    }

    #[rstest]
    fn rejects_file_directory_clash(dir: TempDir) {
        let database = Database::new(dir.path());

        assert!(TreeBuilder::new(&database)
            .build(&[entry("a"), entry("a/b")])
            .is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn order_of_input_does_not_change_the_root(
            names in proptest::collection::btree_set("[a-c]{1,2}(\\.[a-c])?", 1..10),
        ) {
            let dir = TempDir::new().unwrap();
            let database = Database::new(dir.path());
            // nest every other name under a directory of the same stem
            let entries: Vec<IndexEntry> = names
                .iter()
                .enumerate()
                .map(|(i, name)| if i % 2 == 0 { entry(name) } else { entry(&format!("d/{name}")) })
                .collect();
            let mut reversed = entries.clone();
            reversed.reverse();

            let builder = TreeBuilder::new(&database);
            let forward = builder.build(&entries).unwrap();
            let backward = builder.build(&reversed).unwrap();

            prop_assert_eq!(forward.root, backward.root);
            prop_assert_eq!(backward.written, 0);
        }
    }
}
