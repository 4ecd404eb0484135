use crate::areas::index::Index;
use crate::areas::workspace::{EntryKind, Workspace};
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use crate::errors::Result;
use derive_new::new;

/// Change detection shared by status and switch
#[derive(Debug, new)]
pub struct Inspector<'w> {
    workspace: &'w Workspace,
}

impl Inspector<'_> {
    /// Size and mode first; when those agree but the timestamps do not, the
    /// file is hashed to settle it.
    pub fn check_index_against_workspace(
        &self,
        entry: &IndexEntry,
        stat: Option<&EntryMetadata>,
    ) -> Result<WorkspaceChangeType> {
        let Some(stat) = stat else {
            return Ok(WorkspaceChangeType::Deleted);
        };

        if !entry.stat_match(stat) {
            return Ok(WorkspaceChangeType::Modified);
        }
        if entry.times_match(stat) {
            return Ok(WorkspaceChangeType::None);
        }

        let oid = self.workspace.read_blob(&entry.path)?.object_id()?;
        if oid != entry.oid {
            return Ok(WorkspaceChangeType::Modified);
        }

        Ok(WorkspaceChangeType::None)
    }

    pub fn check_index_against_head_tree(
        entry: Option<&IndexEntry>,
        head_entry: Option<&DatabaseEntry>,
    ) -> IndexChangeType {
        match (entry, head_entry) {
            (Some(entry), Some(head_entry))
                if head_entry.mode != entry.mode() || head_entry.oid != entry.oid =>
            {
                IndexChangeType::Modified
            }
            (Some(_), None) => IndexChangeType::Added,
            (None, Some(_)) => IndexChangeType::Deleted,
            _ => IndexChangeType::None,
        }
    }

    /// True when some file at or below `path` is missing from the index.
    pub fn has_untracked_files(&self, path: &str, index: &Index) -> Result<bool> {
        Ok(self
            .workspace
            .list_files(path)?
            .iter()
            .any(|file| index.find_entry(file).is_none()))
    }

    /// Walk the working directory. Tracked files get their stat recorded;
    /// untracked files are listed by name, and untracked directories that
    /// hold at least one file are listed once as `dir/`.
    pub fn scan_workspace(
        &self,
        dir: &str,
        index: &Index,
        stats: &mut Vec<(String, EntryMetadata)>,
        untracked: &mut Vec<String>,
    ) -> Result<()> {
        for (path, kind) in self.workspace.list_dir(dir)? {
            match kind {
                EntryKind::File if index.find_entry(&path).is_some() => {
                    stats.push((path.clone(), self.workspace.stat_file(&path)?));
                }
                EntryKind::File => untracked.push(path),
                EntryKind::Dir if index.is_tracked_dir(&path) => {
                    self.scan_workspace(&path, index, stats, untracked)?;
                }
                EntryKind::Dir => {
                    if !self.workspace.list_files(&path)?.is_empty() {
                        untracked.push(format!("{path}/"));
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::file_mode::FileMode;
    use crate::artifacts::objects::object_id::ObjectId;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dir() -> TempDir {
        TempDir::new().unwrap()
    }

    fn tracked(workspace: &Workspace, path: &str) -> IndexEntry {
        let oid = workspace.read_blob(path).unwrap().object_id().unwrap();
        IndexEntry::from_stat(path, oid, workspace.stat_file(path).unwrap())
    }

    #[rstest]
    fn fresh_entry_is_unchanged(dir: TempDir) {
        dir.child("a.txt").write_str("hello").unwrap();
        let workspace = Workspace::new(dir.path());
        let entry = tracked(&workspace, "a.txt");
        let stat = workspace.stat_file("a.txt").unwrap();

        let change = Inspector::new(&workspace)
            .check_index_against_workspace(&entry, Some(&stat))
            .unwrap();

        assert_eq!(change, WorkspaceChangeType::None);
    }

    #[rstest]
    fn same_size_different_content_is_modified(dir: TempDir) {
        dir.child("a.txt").write_str("hello").unwrap();
        let workspace = Workspace::new(dir.path());
        let mut entry = tracked(&workspace, "a.txt");
        entry.metadata.mtime_nsec = entry.metadata.mtime_nsec.wrapping_add(1);
        dir.child("a.txt").write_str("HELLO").unwrap();
        let stat = workspace.stat_file("a.txt").unwrap();

        let change = Inspector::new(&workspace)
            .check_index_against_workspace(&entry, Some(&stat))
            .unwrap();

        assert_eq!(change, WorkspaceChangeType::Modified);
    }

    #[rstest]
    fn missing_file_is_deleted(dir: TempDir) {
        let workspace = Workspace::new(dir.path());
        let entry = IndexEntry::from_tree("gone.txt", ObjectId::hash(b"x"), FileMode::Regular);

        let change = Inspector::new(&workspace)
            .check_index_against_workspace(&entry, None)
            .unwrap();

        assert_eq!(change, WorkspaceChangeType::Deleted);
    }

    #[test]
    fn head_comparison_covers_every_case() {
        let oid = Blob::new(Bytes::from_static(b"x")).object_id().unwrap();
        let entry = IndexEntry::from_tree("a", oid, FileMode::Regular);
        let same = DatabaseEntry::new(oid, FileMode::Regular);
        let executable = DatabaseEntry::new(oid, FileMode::Executable);

        assert_eq!(Inspector::check_index_against_head_tree(Some(&entry), Some(&same)), IndexChangeType::None);
        assert_eq!(
            Inspector::check_index_against_head_tree(Some(&entry), Some(&executable)),
            IndexChangeType::Modified
        );
        assert_eq!(Inspector::check_index_against_head_tree(Some(&entry), None), IndexChangeType::Added);
        assert_eq!(Inspector::check_index_against_head_tree(None, Some(&same)), IndexChangeType::Deleted);
    }

    #[rstest]
    fn scan_collapses_untracked_directories(dir: TempDir) {
        dir.child("tracked.txt").write_str("t").unwrap();
        dir.child("loose.txt").write_str("l").unwrap();
        dir.child("fresh/deep/file.txt").write_str("f").unwrap();
        dir.child("empty").create_dir_all().unwrap();
        dir.child("lib/known.rs").write_str("k").unwrap();
        dir.child("lib/new.rs").write_str("n").unwrap();
        let workspace = Workspace::new(dir.path());
        let index = Index::from_entries([
            tracked(&workspace, "tracked.txt"),
            tracked(&workspace, "lib/known.rs"),
        ]);

        let (mut stats, mut untracked) = (Vec::new(), Vec::new());
        Inspector::new(&workspace)
            .scan_workspace("", &index, &mut stats, &mut untracked)
            .unwrap();

        let stat_paths: Vec<&str> = stats.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(stat_paths, vec!["lib/known.rs", "tracked.txt"]);
        assert_eq!(untracked, vec!["fresh/", "lib/new.rs", "loose.txt"]);
    }
}
