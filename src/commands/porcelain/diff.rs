use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::diff::diff_target::DiffTarget;
use crate::artifacts::diff::hunk::Hunk;
use crate::artifacts::diff::myers::{DiffAlgorithm, MyersDiff};
use crate::artifacts::status::file_change::WorkspaceChangeType;

impl Repository {
    /// Unified diff of index against workspace, or of HEAD against the index
    /// with `cached`.
    pub fn diff(&self, cached: bool) -> anyhow::Result<()> {
        let status = self.collect_status()?;
        let index = self.load_index()?;

        let index_side = |path: &str| -> anyhow::Result<DiffTarget> {
            Ok(match index.find_entry(path) {
                Some(entry) => DiffTarget::from_entry(
                    path,
                    &DatabaseEntry::new(entry.oid, entry.mode()),
                    self.database(),
                )?,
                None => DiffTarget::from_nothing(path),
            })
        };

        if cached {
            for (path, _) in status.staged() {
                let head = match status.head_tree.get(path) {
                    Some(entry) => DiffTarget::from_entry(path, entry, self.database())?,
                    None => DiffTarget::from_nothing(path),
                };
                self.print_diff(&head, &index_side(path.as_str())?)?;
            }
        } else {
            for (path, change) in status.unstaged() {
                let workspace = match change {
                    WorkspaceChangeType::Deleted => DiffTarget::from_nothing(path),
                    _ => DiffTarget::from_workspace(path, self.workspace())?,
                };
                self.print_diff(&index_side(path.as_str())?, &workspace)?;
            }
        }

        Ok(())
    }

    fn print_diff(&self, a: &DiffTarget, b: &DiffTarget) -> anyhow::Result<()> {
        if a.same_as(b) {
            return Ok(());
        }

        writeln!(self.writer(), "diff --git a/{} b/{}", a.path, b.path)?;
        self.print_diff_mode(a, b)?;
        self.print_diff_content(a, b)?;

        Ok(())
    }

    fn print_diff_mode(&self, a: &DiffTarget, b: &DiffTarget) -> anyhow::Result<()> {
        match (a.mode, b.mode) {
            (None, Some(mode)) => writeln!(self.writer(), "new file mode {mode}")?,
            (Some(mode), None) => writeln!(self.writer(), "deleted file mode {mode}")?,
            (Some(old), Some(new)) if old != new => {
                writeln!(self.writer(), "old mode {old}")?;
                writeln!(self.writer(), "new mode {new}")?;
            }
            _ => {}
        }

        Ok(())
    }

    fn print_diff_content(&self, a: &DiffTarget, b: &DiffTarget) -> anyhow::Result<()> {
        if a.same_content(b) {
            return Ok(());
        }

        let mut oid_range = format!("index {}..{}", a.short_oid(), b.short_oid());
        if let (Some(old), Some(new)) = (a.mode, b.mode)
            && old == new
        {
            oid_range.push_str(&format!(" {old}"));
        }

        writeln!(self.writer(), "{oid_range}")?;
        writeln!(self.writer(), "--- {}", a.diff_path("a"))?;
        writeln!(self.writer(), "+++ {}", b.diff_path("b"))?;

        let edits = MyersDiff::new(&a.data, &b.data).diff();
        for hunk in Hunk::build(&edits) {
            write!(self.writer(), "{hunk}")?;
        }

        Ok(())
    }
}
