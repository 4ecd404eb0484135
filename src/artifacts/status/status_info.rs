use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::PathMap;
use crate::artifacts::index::index_entry::EntryMetadata;
use crate::artifacts::status::file_change::{FileChange, IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::inspector::Inspector;
use crate::errors::Result;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

pub type ChangeSet = BTreeMap<String, FileChange>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusInfo {
    /// Tracked paths with a change on at least one side
    pub changes: ChangeSet,
    /// Untracked files, and untracked directories as `dir/`
    pub untracked: BTreeSet<String>,
    pub head_tree: PathMap,
    /// Whether stat data in the index was refreshed and is worth saving
    pub index_refreshed: bool,
}

impl StatusInfo {
    pub fn staged(&self) -> impl Iterator<Item = (&String, IndexChangeType)> {
        self.changes
            .iter()
            .filter(|(_, change)| change.index_change != IndexChangeType::None)
            .map(|(path, change)| (path, change.index_change))
    }

    pub fn unstaged(&self) -> impl Iterator<Item = (&String, WorkspaceChangeType)> {
        self.changes
            .iter()
            .filter(|(_, change)| change.workspace_change != WorkspaceChangeType::None)
            .map(|(path, change)| (path, change.workspace_change))
    }

    pub fn is_clean(&self) -> bool {
        self.changes.is_empty() && self.untracked.is_empty()
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl Status<'_> {
    /// Compare HEAD, the index and the working directory. Entries whose
    /// content turned out unchanged get fresh stat data in `index`.
    pub fn collect(&self, index: &mut Index) -> Result<StatusInfo> {
        let inspector = Inspector::new(self.repository.workspace());
        let mut stats = Vec::new();
        let mut untracked = Vec::new();
        inspector.scan_workspace("", index, &mut stats, &mut untracked)?;
        let stats: BTreeMap<String, EntryMetadata> = stats.into_iter().collect();

        let head_tree = self.repository.head_tree()?;
        let mut changes = ChangeSet::new();
        let mut refreshed = Vec::new();

        for entry in index.entries() {
            let stat = stats.get(&entry.path);
            let workspace_change = inspector.check_index_against_workspace(entry, stat)?;
            if let (WorkspaceChangeType::None, Some(stat)) = (workspace_change, stat)
                && entry.metadata != *stat
            {
                refreshed.push((entry.path.clone(), *stat));
            }

            let index_change =
                Inspector::check_index_against_head_tree(Some(entry), head_tree.get(&entry.path));

            let change = FileChange {
                index_change,
                workspace_change,
            };
            if !change.is_unchanged() {
                changes.insert(entry.path.clone(), change);
            }
        }

        for path in head_tree.keys() {
            if index.find_entry(path).is_none() {
                changes.entry(path.clone()).or_default().index_change = IndexChangeType::Deleted;
            }
        }

        let index_refreshed = !refreshed.is_empty();
        for (path, stat) in refreshed {
            index.update_entry_stat(&path, stat);
        }

        Ok(StatusInfo {
            changes,
            untracked: untracked.into_iter().collect(),
            head_tree,
            index_refreshed,
        })
    }
}
