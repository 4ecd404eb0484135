use crate::areas::repository::Repository;
use crate::artifacts::tree::walker::TreeWalker;
use anyhow::Context;
use tracing::info;

impl Repository {
    /// Replace the whole index with the leaves of a tree-ish.
    pub fn read_tree(&self, tree_ish: &str) -> anyhow::Result<()> {
        let oid = self.resolve_revision(tree_ish)?;
        let tree = self
            .database()
            .peel_to_tree(&oid)
            .with_context(|| format!("not a tree object: {tree_ish}"))?;

        let entries = TreeWalker::new(self.database()).read_tree(&tree)?;
        let mut index = self.load_index()?;
        index.replace_all(entries);
        self.save_index(&index)?;
        info!(%tree, entries = index.len(), "read tree into index");

        Ok(())
    }
}
