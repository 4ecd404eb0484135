use crate::areas::repository::Repository;

const DETACHED_HEAD: &str = "detached HEAD";

impl Repository {
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let outcome = self.commit_index(message)?;

        let branch = outcome
            .branch
            .as_ref()
            .map(|branch| branch.to_string())
            .unwrap_or_else(|| DETACHED_HEAD.to_string());
        let root = if outcome.is_root() { "(root-commit) " } else { "" };

        writeln!(
            self.writer(),
            "[{branch} {root}{}] {}",
            outcome.oid.to_short_oid(),
            outcome.commit.title_line()
        )?;

        Ok(())
    }
}
