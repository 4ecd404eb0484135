//! References (HEAD and branches)
//!
//! Refs are small text files below `.gel`:
//! - Symbolic: `ref: refs/heads/<branch>\n`, used by HEAD
//! - Plain: a 64-character hex commit hash followed by a newline
//!
//! Resolving a name always takes two separate hops, symbolic first and plain
//! second, so the intermediate ref stays visible to `symbolic-ref` and branch
//! listing.
//!
//! ## Locking
//!
//! Every write holds an exclusive `file-guard` lock on the ref file.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{HEAD, HEADS_PREFIX, REF_ALIASES, REFS_PREFIX};
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GelError, IoContext, Result};
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const SYMREF_PREFIX: &str = "ref: ";

#[derive(Debug)]
pub struct Refs {
    /// The `.gel` directory; ref names are paths relative to it
    path: PathBuf,
}

impl Refs {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Refs { path: path.into() }
    }

    fn ref_file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    pub fn head_path(&self) -> PathBuf {
        self.ref_file(HEAD)
    }

    pub fn heads_path(&self) -> PathBuf {
        self.ref_file(HEADS_PREFIX.trim_end_matches('/'))
    }

    fn read_raw(&self, name: &str) -> Result<Option<String>> {
        let path = self.ref_file(name);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content.trim_end().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::IsADirectory => Ok(None),
            Err(e) => Err(GelError::io(path, e)),
        }
    }

    /// Target of a symbolic ref, or `None` if the ref is missing or plain.
    pub fn read_symbolic(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .read_raw(name)?
            .and_then(|content| content.strip_prefix(SYMREF_PREFIX).map(str::to_string)))
    }

    /// Hash held by a plain ref; `None` when the file does not exist.
    pub fn read_plain(&self, name: &str) -> Result<Option<ObjectId>> {
        match self.read_raw(name)? {
            None => Ok(None),
            Some(content) if content.starts_with(SYMREF_PREFIX) => {
                Err(GelError::MalformedRef(format!("{name} is symbolic, expected a hash")))
            }
            Some(content) => ObjectId::try_parse(&content)
                .map(Some)
                .map_err(|_| GelError::MalformedRef(format!("{name}: {content:?}"))),
        }
    }

    /// Commit HEAD points at, `None` on an unborn branch.
    pub fn read_head(&self) -> Result<Option<ObjectId>> {
        match self.read_symbolic(HEAD)? {
            Some(target) => self.read_plain(&target),
            None => self.read_plain(HEAD),
        }
    }

    /// Resolve `HEAD`, `@`, `refs/...`, a branch name or a full hex id.
    pub fn resolve(&self, name: &str) -> Result<ObjectId> {
        let name = REF_ALIASES.get(name).copied().unwrap_or(name);

        if name == HEAD {
            let target = self.read_symbolic(HEAD)?.unwrap_or_else(|| HEAD.to_string());
            return self
                .read_plain(&target)?
                .ok_or(GelError::RefNotFound(target));
        }

        if name.starts_with(REFS_PREFIX) {
            return self
                .read_plain(name)?
                .ok_or_else(|| GelError::RefNotFound(name.to_string()));
        }

        let branch_ref = format!("{HEADS_PREFIX}{name}");
        if let Some(oid) = self.read_plain(&branch_ref)? {
            return Ok(oid);
        }

        if name.len() == OBJECT_ID_LENGTH {
            if let Ok(oid) = ObjectId::try_parse(name) {
                return Ok(oid);
            }
        }

        Err(GelError::RefNotFound(name.to_string()))
    }

    /// Point a ref under `refs/` at a commit.
    pub fn write_ref(&self, name: &str, oid: &ObjectId) -> Result<()> {
        Self::check_namespace(name)?;
        self.update_ref_file(&self.ref_file(name), &format!("{oid}\n"))?;
        debug!(ref_name = name, %oid, "updated ref");

        Ok(())
    }

    fn check_namespace(name: &str) -> Result<()> {
        let outside = !name.starts_with(REFS_PREFIX)
            || name
                .split('/')
                .any(|c| c.is_empty() || c == "." || c == "..");
        if outside {
            return Err(GelError::RefOutsideNamespace(name.to_string()));
        }

        Ok(())
    }

    /// Make HEAD a symbolic ref to `target`, which must live under `refs/`.
    pub fn write_symbolic(&self, name: &str, target: &str) -> Result<()> {
        Self::check_namespace(target)?;
        self.update_ref_file(&self.ref_file(name), &format!("{SYMREF_PREFIX}{target}\n"))?;
        debug!(ref_name = name, target, "updated symbolic ref");

        Ok(())
    }

    pub fn set_head_symbolic(&self, branch: &BranchName) -> Result<()> {
        self.write_symbolic(HEAD, &branch.ref_path())
    }

    /// Advance whatever HEAD points at: the current branch, or HEAD itself
    /// when it holds a bare hash.
    pub fn update_head(&self, oid: &ObjectId) -> Result<()> {
        match self.read_symbolic(HEAD)? {
            Some(target) => self.write_ref(&target, oid),
            None => self.update_ref_file(&self.head_path(), &format!("{oid}\n")),
        }
    }

    pub fn current_branch(&self) -> Result<Option<BranchName>> {
        self.read_symbolic(HEAD)?
            .map(|target| BranchName::try_from_ref_path(&target))
            .transpose()
    }

    fn update_ref_file(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).at_path(parent)?;
        }

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .at_path(path)?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1).at_path(path)?;

        let file = lock.deref_mut();
        file.set_len(0).at_path(path)?;
        file.write_all(content.as_bytes()).at_path(path)?;

        Ok(())
    }

    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.ref_file(&name.ref_path()).is_file()
    }

    pub fn create_branch(&self, name: &BranchName, oid: &ObjectId) -> Result<()> {
        if self.branch_exists(name) {
            return Err(GelError::BranchAlreadyExists(name.to_string()));
        }

        self.write_ref(&name.ref_path(), oid)?;
        info!(branch = %name, %oid, "created branch");

        Ok(())
    }

    /// Remove a branch that is not checked out. Returns the commit it held.
    pub fn delete_branch(&self, name: &BranchName) -> Result<ObjectId> {
        if self.current_branch()?.as_ref() == Some(name) {
            return Err(GelError::CannotDeleteCurrentBranch(name.to_string()));
        }

        let ref_path = name.ref_path();
        let oid = self
            .read_plain(&ref_path)?
            .ok_or_else(|| GelError::RefNotFound(name.to_string()))?;

        let branch_path = self.ref_file(&ref_path);
        std::fs::remove_file(&branch_path).at_path(&branch_path)?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;
        info!(branch = %name, %oid, "deleted branch");

        Ok(oid)
    }

    /// All branches, sorted by name
    pub fn list_branches(&self) -> Result<Vec<BranchName>> {
        let mut branches = WalkDir::new(self.heads_path())
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.path).ok()?;
                let ref_path = relative.to_str()?.replace(std::path::MAIN_SEPARATOR, "/");
                BranchName::try_from_ref_path(&ref_path).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> Result<()> {
        let heads = self.heads_path();
        let mut current = path.parent();

        while let Some(parent) = current {
            if parent == heads || !parent.starts_with(&heads) {
                break;
            }
            let is_empty = parent.read_dir().at_path(parent)?.next().is_none();
            if !is_empty {
                break;
            }
            std::fs::remove_dir(parent).at_path(parent)?;
            current = parent.parent();
        }

        Ok(())
    }
}
