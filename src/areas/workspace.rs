//! Working directory I/O
//!
//! Paths handed in and out are relative to the repository root and use `/`
//! separators, the same shape index entries and tree paths have. The `.gel`
//! directory is never listed.

use crate::artifacts::index::index_entry::EntryMetadata;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::file_mode::FileMode;
use crate::config::GEL_DIR;
use crate::errors::{GelError, IoContext, Result};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Kind of a workspace entry, as reported by `list_dir`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Workspace { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn absolute(&self, path: &str) -> PathBuf {
        self.path.join(path)
    }

    fn is_ignored(path: &Path) -> bool {
        path.components()
            .any(|c| matches!(c, Component::Normal(name) if name == GEL_DIR))
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.path).ok()?;
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        (!parts.is_empty()).then(|| parts.join("/"))
    }

    /// Normalize a user-supplied path (absolute, or relative to the root)
    /// into a root-relative `/` path. `""` means the root itself.
    pub fn normalize(&self, path: &Path) -> Result<String> {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.path.join(path)
        };

        let mut parts: Vec<String> = Vec::new();
        let relative = joined
            .strip_prefix(&self.path)
            .map_err(|_| GelError::InvalidPath(format!("{} is outside the repository", path.display())))?;
        for component in relative.components() {
            match component {
                Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir => {
                    parts.pop().ok_or_else(|| {
                        GelError::InvalidPath(format!("{} is outside the repository", path.display()))
                    })?;
                }
                _ => return Err(GelError::InvalidPath(path.display().to_string())),
            }
        }

        Ok(parts.join("/"))
    }

    /// Every file below `start` (a file path yields itself), sorted.
    /// Missing paths yield nothing.
    pub fn list_files(&self, start: &str) -> Result<Vec<String>> {
        let root = self.absolute(start);
        if std::fs::symlink_metadata(&root).is_err() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !Self::is_ignored(e.path()))
        {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                GelError::io(path, std::io::Error::other(e.to_string()))
            })?;
            if entry.file_type().is_dir() {
                continue;
            }
            if let Some(path) = self.relative(entry.path()) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Immediate children of a directory, keyed by relative path
    pub fn list_dir(&self, dir: &str) -> Result<BTreeMap<String, EntryKind>> {
        let absolute = self.absolute(dir);
        let mut children = BTreeMap::new();

        for entry in std::fs::read_dir(&absolute).at_path(&absolute)? {
            let entry = entry.at_path(&absolute)?;
            let path = entry.path();
            if Self::is_ignored(&path) {
                continue;
            }
            let file_type = entry.file_type().at_path(&path)?;
            if let Some(relative) = self.relative(&path) {
                let kind = if file_type.is_dir() {
                    EntryKind::Dir
                } else {
                    EntryKind::File
                };
                children.insert(relative, kind);
            }
        }

        Ok(children)
    }

    pub fn exists(&self, path: &str) -> bool {
        std::fs::symlink_metadata(self.absolute(path)).is_ok()
    }

    /// File content; for a symlink, the link target.
    pub fn read_file(&self, path: &str) -> Result<Bytes> {
        let absolute = self.absolute(path);
        let metadata = std::fs::symlink_metadata(&absolute).at_path(&absolute)?;

        if metadata.file_type().is_symlink() {
            let target = std::fs::read_link(&absolute).at_path(&absolute)?;
            return Ok(Bytes::from(target.to_string_lossy().into_owned()));
        }

        Ok(Bytes::from(std::fs::read(&absolute).at_path(&absolute)?))
    }

    pub fn read_blob(&self, path: &str) -> Result<Blob> {
        Ok(Blob::new(self.read_file(path)?))
    }

    /// Stat data for change detection. Symlinks are not followed.
    pub fn stat_file(&self, path: &str) -> Result<EntryMetadata> {
        let absolute = self.absolute(path);
        let metadata = std::fs::symlink_metadata(&absolute).at_path(&absolute)?;

        (absolute.as_path(), &metadata).try_into()
    }

    /// Stat data, or `None` when nothing is there.
    pub fn try_stat_file(&self, path: &str) -> Result<Option<EntryMetadata>> {
        match std::fs::symlink_metadata(self.absolute(path)) {
            Ok(metadata) if metadata.is_dir() => Ok(None),
            Ok(metadata) => Ok(Some((self.absolute(path).as_path(), &metadata).try_into()?)),
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(GelError::io(self.absolute(path), e)),
        }
    }

    /// Write `data` at `path`, clearing anything in the way: a file where a
    /// parent directory should be, or a directory where the file should be.
    pub fn write_file(&self, path: &str, data: &[u8], mode: FileMode) -> Result<()> {
        let absolute = self.absolute(path);
        self.make_parent_dirs(path)?;

        match std::fs::symlink_metadata(&absolute) {
            Ok(metadata) if metadata.is_dir() => {
                std::fs::remove_dir_all(&absolute).at_path(&absolute)?
            }
            Ok(_) => std::fs::remove_file(&absolute).at_path(&absolute)?,
            Err(_) => {}
        }

        if mode == FileMode::Symlink {
            return Self::write_symlink(&absolute, data);
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&absolute)
            .at_path(&absolute)?;
        file.write_all(data).at_path(&absolute)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(match mode {
                FileMode::Executable => 0o755,
                _ => 0o644,
            });
            std::fs::set_permissions(&absolute, permissions).at_path(&absolute)?;
        }

        debug!(path, bytes = data.len(), "wrote workspace file");
        Ok(())
    }

    #[cfg(unix)]
    fn write_symlink(absolute: &Path, target: &[u8]) -> Result<()> {
        let target = String::from_utf8_lossy(target).into_owned();
        std::os::unix::fs::symlink(target, absolute).at_path(absolute)
    }

    #[cfg(not(unix))]
    fn write_symlink(absolute: &Path, target: &[u8]) -> Result<()> {
        std::fs::write(absolute, target).at_path(absolute)
    }

    fn make_parent_dirs(&self, path: &str) -> Result<()> {
        let Some((parents, _)) = path.rsplit_once('/') else {
            return Ok(());
        };

        let mut current = self.path.clone();
        for component in parents.split('/') {
            current.push(component);
            match std::fs::symlink_metadata(&current) {
                Ok(metadata) if metadata.is_dir() => continue,
                Ok(_) => std::fs::remove_file(&current).at_path(&current)?,
                Err(_) => {}
            }
            std::fs::create_dir(&current).at_path(&current)?;
        }

        Ok(())
    }

    /// Delete a file and any parent directories it leaves empty. A missing
    /// file is not an error.
    pub fn remove_file(&self, path: &str) -> Result<()> {
        let absolute = self.absolute(path);
        match std::fs::symlink_metadata(&absolute) {
            Ok(metadata) if metadata.is_dir() => return Ok(()),
            Ok(_) => std::fs::remove_file(&absolute).at_path(&absolute)?,
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
                ) => {}
            Err(e) => return Err(GelError::io(absolute, e)),
        }

        self.prune_empty_parents(path)
    }

    fn prune_empty_parents(&self, path: &str) -> Result<()> {
        let mut current = path;
        while let Some((parent, _)) = current.rsplit_once('/') {
            let absolute = self.absolute(parent);
            let is_empty = match std::fs::read_dir(&absolute) {
                Ok(mut entries) => entries.next().is_none(),
                Err(_) => false,
            };
            if !is_empty {
                break;
            }
            std::fs::remove_dir(&absolute).at_path(&absolute)?;
            current = parent;
        }

        Ok(())
    }
}
