use crate::areas::repository::Repository;
use std::path::Path;

const GLOB_CHARS: [char; 3] = ['*', '?', '['];

impl Repository {
    /// Unstage paths (directories and globs included). Without `cached` the
    /// files also leave the working directory.
    pub fn rm(&self, paths: &[String], cached: bool) -> anyhow::Result<()> {
        let mut index = self.load_index()?;
        let mut removed = Vec::new();

        for pathspec in paths {
            let matches: Vec<String> = if pathspec.contains(GLOB_CHARS) {
                index
                    .find_entries_by_pattern(pathspec)?
                    .into_iter()
                    .map(|entry| entry.path.clone())
                    .collect()
            } else {
                let path = self.workspace().normalize(Path::new(pathspec))?;
                index
                    .find_entries_by_prefix(&path)
                    .into_iter()
                    .map(|entry| entry.path.clone())
                    .collect()
            };

            if matches.is_empty() {
                anyhow::bail!("pathspec '{pathspec}' did not match any files");
            }

            for path in matches {
                index.remove(&path);
                removed.push(path);
            }
        }

        self.save_index(&index)?;

        for path in removed {
            if !cached {
                self.workspace().remove_file(&path)?;
            }
            writeln!(self.writer(), "rm '{path}'")?;
        }

        Ok(())
    }
}
