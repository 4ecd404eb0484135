use crate::areas::repository::Repository;
use crate::artifacts::status::file_change::long_format_line;
use crate::artifacts::status::status_info::StatusInfo;

impl Repository {
    pub fn status(&self, porcelain: bool) -> anyhow::Result<()> {
        let status = self.collect_status()?;

        if porcelain {
            self.print_porcelain(&status)
        } else {
            self.print_long_format(&status)
        }
    }

    fn print_porcelain(&self, status: &StatusInfo) -> anyhow::Result<()> {
        for (path, change) in &status.changes {
            writeln!(self.writer(), "{change} {path}")?;
        }
        for path in &status.untracked {
            writeln!(self.writer(), "?? {path}")?;
        }

        Ok(())
    }

    fn print_long_format(&self, status: &StatusInfo) -> anyhow::Result<()> {
        match self.refs().current_branch()? {
            Some(branch) => writeln!(self.writer(), "On branch {branch}")?,
            None => writeln!(self.writer(), "HEAD detached")?,
        }
        if self.refs().read_head()?.is_none() {
            writeln!(self.writer(), "\nNo commits yet")?;
        }
        writeln!(self.writer())?;

        let staged: Vec<String> = status
            .staged()
            .map(|(path, change)| long_format_line(change.label(), path))
            .collect();
        let unstaged: Vec<String> = status
            .unstaged()
            .map(|(path, change)| long_format_line(change.label(), path))
            .collect();
        let untracked: Vec<String> = status.untracked.iter().map(|path| format!("\t{path}")).collect();

        self.print_section("Changes to be committed:", &staged)?;
        self.print_section("Changes not staged for commit:", &unstaged)?;
        self.print_section("Untracked files:", &untracked)?;

        let summary = match (staged.is_empty(), unstaged.is_empty(), untracked.is_empty()) {
            (false, _, _) => return Ok(()),
            (true, false, _) => "no changes added to commit",
            (true, true, false) => "nothing added to commit but untracked files present",
            (true, true, true) => "nothing to commit, working tree clean",
        };
        writeln!(self.writer(), "{summary}")?;

        Ok(())
    }

    fn print_section(&self, title: &str, lines: &[String]) -> anyhow::Result<()> {
        if lines.is_empty() {
            return Ok(());
        }

        writeln!(self.writer(), "{title}")?;
        for line in lines {
            writeln!(self.writer(), "{line}")?;
        }
        writeln!(self.writer())?;

        Ok(())
    }
}
