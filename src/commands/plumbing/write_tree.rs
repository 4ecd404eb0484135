use crate::areas::repository::Repository;

impl Repository {
    pub fn write_tree(&self) -> anyhow::Result<()> {
        let index = self.load_index()?;
        let outcome = self.build_tree(&index)?;

        writeln!(self.writer(), "{}", outcome.root)?;

        Ok(())
    }
}
