use crate::areas::repository::Repository;
use anyhow::Context;
use std::path::Path;

impl Repository {
    /// Stage every file below each path. Tracked files that disappeared from
    /// below a path are unstaged. Nothing is saved unless every path works.
    pub fn add(&self, paths: &[String]) -> anyhow::Result<()> {
        let mut index = self.load_index()?;

        for pathspec in paths {
            let path = self.workspace().normalize(Path::new(pathspec))?;
            let files = self.workspace().list_files(&path)?;
            let gone: Vec<String> = index
                .find_entries_by_prefix(&path)
                .into_iter()
                .filter(|entry| files.binary_search(&entry.path).is_err())
                .map(|entry| entry.path.clone())
                .collect();

            if files.is_empty() && gone.is_empty() {
                anyhow::bail!("pathspec '{pathspec}' did not match any files");
            }

            for path in gone {
                index.remove(&path);
            }
            for file in files {
                self.stage_file(&mut index, &file)
                    .with_context(|| format!("adding '{file}' failed"))?;
            }
        }

        self.save_index(&index)?;

        Ok(())
    }
}
