use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub oneline: bool,
    /// Revisions to start from; HEAD when empty
    pub revisions: Vec<String>,
}

impl Repository {
    pub fn log(&self, options: &LogOptions) -> anyhow::Result<()> {
        let starts = if options.revisions.is_empty() {
            match self.refs().read_head()? {
                Some(oid) => vec![oid],
                None => {
                    let branch = self
                        .refs()
                        .current_branch()?
                        .map(|branch| branch.to_string())
                        .unwrap_or_else(|| "HEAD".to_string());
                    anyhow::bail!("your current branch '{branch}' does not have any commits yet");
                }
            }
        } else {
            options
                .revisions
                .iter()
                .map(|revision| self.resolve_revision(revision))
                .collect::<Result<Vec<_>, _>>()?
        };

        for (position, item) in RevList::new(self.database(), starts).enumerate() {
            let (oid, commit) = item?;
            if options.oneline {
                self.show_commit_oneline(&oid, &commit)?;
            } else {
                if position > 0 {
                    writeln!(self.writer())?;
                }
                self.show_commit_medium(&oid, &commit)?;
            }
        }

        Ok(())
    }

    fn show_commit_medium(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(self.writer(), "commit {oid}")?;
        writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
        writeln!(self.writer(), "Date:   {}", commit.author().readable_timestamp())?;
        writeln!(self.writer())?;
        for line in commit.message().lines() {
            writeln!(self.writer(), "    {line}")?;
        }

        Ok(())
    }

    fn show_commit_oneline(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(self.writer(), "{} {}", oid.to_short_oid(), commit.title_line())?;

        Ok(())
    }
}
