use crate::areas::repository::Repository;

impl Repository {
    /// List staged paths; `stage` adds mode, oid and stage number.
    pub fn ls_files(&self, stage: bool) -> anyhow::Result<()> {
        let index = self.load_index()?;

        for entry in index.entries() {
            if stage {
                writeln!(
                    self.writer(),
                    "{} {} {}\t{}",
                    entry.mode(),
                    entry.oid,
                    entry.stage(),
                    entry.path
                )?;
            } else {
                writeln!(self.writer(), "{}", entry.path)?;
            }
        }

        Ok(())
    }
}
