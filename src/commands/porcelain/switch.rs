use crate::areas::repository::{Repository, SwitchOutcome};
use crate::artifacts::branch::branch_name::BranchName;

impl Repository {
    pub fn switch(&self, name: &str) -> anyhow::Result<()> {
        let branch = BranchName::try_parse(name)?;

        match self.switch_branch(&branch)? {
            SwitchOutcome::AlreadyOn => writeln!(self.writer(), "Already on '{branch}'")?,
            SwitchOutcome::Switched { .. } => {
                writeln!(self.writer(), "Switched to branch '{branch}'")?
            }
        }

        Ok(())
    }
}
