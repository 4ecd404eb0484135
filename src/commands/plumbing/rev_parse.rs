use crate::areas::repository::Repository;

impl Repository {
    pub fn rev_parse(&self, revision: &str) -> anyhow::Result<()> {
        let oid = self.resolve_revision(revision)?;
        writeln!(self.writer(), "{oid}")?;

        Ok(())
    }
}
