use crate::areas::repository::Repository;

impl Repository {
    pub fn update_ref(&self, name: &str, revision: &str) -> anyhow::Result<()> {
        let oid = self.resolve_revision(revision)?;
        self.refs().write_ref(name, &oid)?;

        Ok(())
    }
}
