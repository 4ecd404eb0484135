use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;

impl Repository {
    /// Write a commit for an existing tree without touching any ref.
    pub fn commit_tree(&self, tree: &str, parents: &[String], message: &str) -> anyhow::Result<()> {
        let tree = self.resolve_revision(tree)?;
        let tree_type = self.database().object_type(&tree)?;
        if tree_type != ObjectType::Tree {
            anyhow::bail!("{tree} is a {tree_type}, not a tree");
        }

        let parents = parents
            .iter()
            .map(|parent| self.resolve_revision(parent))
            .collect::<Result<Vec<_>, _>>()?;

        let (oid, _) = self.create_commit(tree, parents, message)?;
        writeln!(self.writer(), "{oid}")?;

        Ok(())
    }
}
