use crate::areas::repository::Repository;

impl Repository {
    /// Print the target of a symbolic ref, or repoint it when `target` is given.
    pub fn symbolic_ref(&self, name: &str, target: Option<&str>) -> anyhow::Result<()> {
        match target {
            Some(target) => self.refs().write_symbolic(name, target)?,
            None => {
                let target = self
                    .refs()
                    .read_symbolic(name)?
                    .ok_or_else(|| anyhow::anyhow!("ref {name} is not a symbolic ref"))?;
                writeln!(self.writer(), "{target}")?;
            }
        }

        Ok(())
    }
}
