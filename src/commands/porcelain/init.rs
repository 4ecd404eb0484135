use crate::areas::repository::Repository;
use anyhow::Context;

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        self.create_layout()
            .context("failed to create the .gel directory")?;

        writeln!(
            self.writer(),
            "Initialized empty Gel repository in {}",
            self.config().gel_dir().display()
        )?;

        Ok(())
    }
}
