use crate::artifacts::database::database_entry::{DatabaseEntry, PathMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeChangeType {
    Added(DatabaseEntry),
    Deleted(DatabaseEntry),
    Modified { old: DatabaseEntry, new: DatabaseEntry },
}

impl TreeChangeType {
    pub fn from_entries(old: Option<DatabaseEntry>, new: Option<DatabaseEntry>) -> Option<Self> {
        match (old, new) {
            (None, Some(new)) => Some(TreeChangeType::Added(new)),
            (Some(old), None) => Some(TreeChangeType::Deleted(old)),
            (Some(old), Some(new)) if old != new => Some(TreeChangeType::Modified { old, new }),
            _ => None,
        }
    }

    pub fn old_entry(&self) -> Option<&DatabaseEntry> {
        match self {
            TreeChangeType::Deleted(entry) => Some(entry),
            TreeChangeType::Modified { old, .. } => Some(old),
            TreeChangeType::Added(_) => None,
        }
    }

    pub fn new_entry(&self) -> Option<&DatabaseEntry> {
        match self {
            TreeChangeType::Added(entry) => Some(entry),
            TreeChangeType::Modified { new, .. } => Some(new),
            TreeChangeType::Deleted(_) => None,
        }
    }

    pub fn status_char(&self) -> char {
        match self {
            TreeChangeType::Added(_) => 'A',
            TreeChangeType::Deleted(_) => 'D',
            TreeChangeType::Modified { .. } => 'M',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathChange {
    pub path: String,
    pub change: TreeChangeType,
}

/// Compare two flattened snapshots. A path whose oid or mode differs is
/// modified. The result is sorted by path.
pub fn diff_path_maps(old: &PathMap, new: &PathMap) -> Vec<PathChange> {
    let mut changes: Vec<PathChange> = old
        .iter()
        .filter_map(|(path, entry)| {
            TreeChangeType::from_entries(Some(*entry), new.get(path).copied())
                .map(|change| PathChange { path: path.clone(), change })
        })
        .collect();

    changes.extend(
        new.iter()
            .filter(|(path, _)| !old.contains_key(*path))
            .map(|(path, entry)| PathChange {
                path: path.clone(),
                change: TreeChangeType::Added(*entry),
            }),
    );

    changes.sort_by(|a, b| a.path.cmp(&b.path));
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::file_mode::FileMode;
    use crate::artifacts::objects::object_id::ObjectId;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn item(content: &str, mode: FileMode) -> DatabaseEntry {
        DatabaseEntry::new(ObjectId::hash(content.as_bytes()), mode)
    }

    fn map(items: &[(&str, DatabaseEntry)]) -> PathMap {
        items.iter().map(|(p, e)| (p.to_string(), *e)).collect()
    }

    #[test]
    fn classifies_every_kind_of_change() {
        let old = map(&[
            ("same.txt", item("same", FileMode::Regular)),
            ("gone.txt", item("gone", FileMode::Regular)),
            ("edited.txt", item("v1", FileMode::Regular)),
            ("run.sh", item("script", FileMode::Regular)),
        ]);
        let new = map(&[
            ("same.txt", item("same", FileMode::Regular)),
            ("edited.txt", item("v2", FileMode::Regular)),
            ("run.sh", item("script", FileMode::Executable)),
            ("a/new.txt", item("new", FileMode::Regular)),
        ]);

        let changes = diff_path_maps(&old, &new);
        let summary: Vec<(char, &str)> = changes
            .iter()
            .map(|c| (c.change.status_char(), c.path.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![('A', "a/new.txt"), ('M', "edited.txt"), ('D', "gone.txt"), ('M', "run.sh")]
        );
        assert_eq!(changes[3].change.old_entry().unwrap().mode, FileMode::Regular);
        assert_eq!(changes[3].change.new_entry().unwrap().mode, FileMode::Executable);
    }

    proptest! {
        #[test]
        fn identical_maps_have_no_changes(paths in proptest::collection::btree_set("[a-z]{1,6}", 0..12)) {
            let snapshot: PathMap = paths
                .iter()
                .map(|p| (p.clone(), item(p, FileMode::Regular)))
                .collect();

            prop_assert!(diff_path_maps(&snapshot, &snapshot).is_empty());
        }
    }
}
