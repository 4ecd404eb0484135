use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::checkout::conflict::{ConflictType, ConflictsSet, render_conflicts};
use crate::artifacts::diff::tree_diff::{PathChange, TreeChangeType};
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::inspector::Inspector;
use crate::errors::{GelError, Result};
use tracing::debug;

/// Workspace changes that move a checkout from one tree to another
///
/// Conflicts are all detected before anything is touched. Applying then runs
/// in two phases: every added or modified file is written first, and only
/// then are removed files deleted, together with directories they leave
/// empty.
pub struct Migration<'r> {
    database: &'r Database,
    workspace: &'r Workspace,
    changes: Vec<PathChange>,
}

impl<'r> Migration<'r> {
    pub fn new(database: &'r Database, workspace: &'r Workspace, changes: Vec<PathChange>) -> Self {
        Migration {
            database,
            workspace,
            changes,
        }
    }

    pub fn changes(&self) -> &[PathChange] {
        &self.changes
    }

    /// Refuse to run when local work would be lost.
    pub fn check_conflicts(&self, index: &Index) -> Result<()> {
        let inspector = Inspector::new(self.workspace);
        let mut conflicts = ConflictsSet::new();

        for PathChange { path, change } in &self.changes {
            if let Some((conflict_type, path)) = self.find_conflict(path, change, index, &inspector)? {
                conflicts.entry(conflict_type).or_default().push(path);
            }
        }

        if conflicts.values().all(Vec::is_empty) {
            return Ok(());
        }
        for paths in conflicts.values_mut() {
            paths.sort();
            paths.dedup();
        }

        Err(GelError::SwitchConflict(render_conflicts(&conflicts)))
    }

    fn find_conflict(
        &self,
        path: &str,
        change: &TreeChangeType,
        index: &Index,
        inspector: &Inspector<'_>,
    ) -> Result<Option<(ConflictType, String)>> {
        let entry = index.find_entry(path);
        let new_entry = change.new_entry();

        let matches_old = Inspector::check_index_against_head_tree(entry, change.old_entry())
            == IndexChangeType::None;
        let matches_new =
            Inspector::check_index_against_head_tree(entry, new_entry) == IndexChangeType::None;
        if !matches_old && !matches_new {
            return Ok(Some((ConflictType::StaleFile, path.to_string())));
        }

        if let Some(entry) = entry {
            let stat = self.workspace.try_stat_file(path)?;
            if inspector.check_index_against_workspace(entry, stat.as_ref())?
                == WorkspaceChangeType::Modified
            {
                return Ok(Some((ConflictType::StaleFile, path.to_string())));
            }
            return Ok(None);
        }

        if self.workspace.exists(path) {
            let is_dir = self.workspace.try_stat_file(path)?.is_none();
            if is_dir && !inspector.has_untracked_files(path, index)? {
                return Ok(None);
            }
            return Ok(ConflictType::classify(false, is_dir, new_entry).map(|c| (c, path.to_string())));
        }

        if new_entry.is_some() {
            for parent in parent_dirs(path) {
                if index.find_entry(parent).is_none() && self.workspace.try_stat_file(parent)?.is_some() {
                    return Ok(Some((ConflictType::UntrackedOverwritten, parent.to_string())));
                }
            }
        }

        Ok(None)
    }

    /// Write new and changed files, then delete removed ones. Returns the
    /// paths that were written.
    pub fn apply(&self) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for PathChange { path, change } in &self.changes {
            if let Some(entry) = change.new_entry() {
                let blob = self.database.load_blob(&entry.oid)?;
                self.workspace.write_file(path, blob.data(), entry.mode)?;
                written.push(path.clone());
            }
        }

        for PathChange { path, change } in &self.changes {
            if let TreeChangeType::Deleted(_) = change {
                self.workspace.remove_file(path)?;
            }
        }

        debug!(written = written.len(), changes = self.changes.len(), "applied migration");
        Ok(written)
    }
}

/// `a/b/c` gives `a`, then `a/b`
fn parent_dirs(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/').map(move |(at, _)| &path[..at])
}
