use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;

impl Repository {
    /// Create a branch at `start`, or at HEAD when no start is given.
    pub fn branch(&self, name: &str, start: Option<&str>) -> anyhow::Result<()> {
        let name = BranchName::try_parse(name)?;

        let oid = match start {
            Some(start) => self.resolve_revision(start)?,
            None => self
                .refs()
                .read_head()?
                .ok_or_else(|| anyhow::anyhow!("not a valid object name: 'HEAD'"))?,
        };

        self.refs().create_branch(&name, &oid)?;

        Ok(())
    }

    pub fn delete_branch(&self, name: &str) -> anyhow::Result<()> {
        let name = BranchName::try_parse(name)?;
        let oid = self.refs().delete_branch(&name)?;

        writeln!(self.writer(), "Deleted branch {name} (was {}).", oid.to_short_oid())?;

        Ok(())
    }

    /// All branches, the checked out one marked with `*`
    pub fn list_branches(&self) -> anyhow::Result<()> {
        let current = self.refs().current_branch()?;

        for branch in self.refs().list_branches()? {
            let marker = if current.as_ref() == Some(&branch) { '*' } else { ' ' };
            writeln!(self.writer(), "{marker} {branch}")?;
        }

        Ok(())
    }
}
