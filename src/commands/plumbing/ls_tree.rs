use crate::areas::repository::Repository;
use crate::artifacts::tree::walker::{TreeWalker, WalkOptions};

impl Repository {
    /// `<mode> <type> <oid>\t<path>` for every entry the options select.
    pub fn ls_tree(&self, tree_ish: &str, options: WalkOptions) -> anyhow::Result<()> {
        let oid = self.resolve_revision(tree_ish)?;
        let tree = self.database().peel_to_tree(&oid)?;

        let mut lines = Vec::new();
        TreeWalker::new(self.database()).walk(&tree, options, &mut |path, entry| {
            lines.push(format!(
                "{:0>6} {} {}\t{}",
                entry.mode.as_str(),
                entry.mode.object_type(),
                entry.oid,
                path
            ));
            Ok(())
        })?;

        for line in lines {
            writeln!(self.writer(), "{line}")?;
        }

        Ok(())
    }
}
