use crate::areas::repository::Repository;
use anyhow::Context;
use std::path::Path;

impl Repository {
    pub fn hash_object(&self, file: &str, write: bool) -> anyhow::Result<()> {
        let path = self.workspace().normalize(Path::new(file))?;
        let data = self
            .workspace()
            .read_file(&path)
            .with_context(|| format!("could not open '{file}' for reading"))?;

        let oid = self.hash_blob(data, write)?;
        writeln!(self.writer(), "{oid}")?;

        Ok(())
    }
}
