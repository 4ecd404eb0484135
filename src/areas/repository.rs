//! Repository: owner of every on-disk area
//!
//! A `Repository` is built from an explicit [`RepositoryConfig`] and wires the
//! object database, the working directory and the refs together. The engine
//! operations here return typed [`GelError`]s; the command layer in
//! `crate::commands` adds user-facing output on top of them.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::database::database_entry::PathMap;
use crate::artifacts::diff::tree_diff::diff_path_maps;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, Identity};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use crate::artifacts::tree::builder::{BuildOutcome, TreeBuilder};
use crate::artifacts::tree::walker::TreeWalker;
use crate::config::{DEFAULT_BRANCH, RepositoryConfig, UserConfig};
use crate::errors::{GelError, IoContext, Result};
use std::cell::{RefCell, RefMut};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Commit written by [`Repository::commit_index`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub oid: ObjectId,
    pub commit: Commit,
    /// Branch HEAD pointed at, `None` when HEAD is detached
    pub branch: Option<BranchName>,
}

impl CommitOutcome {
    pub fn is_root(&self) -> bool {
        self.commit.parents().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    AlreadyOn,
    Switched { changed: usize },
}

pub struct Repository {
    config: RepositoryConfig,
    writer: RefCell<Box<dyn Write>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(config: RepositoryConfig, writer: Box<dyn Write>) -> Self {
        let database = Database::new(config.objects_path());
        let workspace = Workspace::new(config.root());
        let refs = Refs::new(config.gel_dir());

        Repository {
            config,
            writer: RefCell::new(writer),
            database,
            workspace,
            refs,
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        self.config.root()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Create `.gel` with its object and ref directories and point HEAD at
    /// the default branch. An existing HEAD is left alone.
    pub fn create_layout(&self) -> Result<()> {
        for dir in [self.config.objects_path(), self.config.heads_path()] {
            std::fs::create_dir_all(&dir).at_path(&dir)?;
        }

        if !self.config.head_path().exists() {
            let branch = BranchName::try_parse(DEFAULT_BRANCH)?;
            self.refs.set_head_symbolic(&branch)?;
        }
        info!(path = %self.config.gel_dir().display(), "initialized repository");

        Ok(())
    }

    pub fn load_index(&self) -> Result<Index> {
        Index::load(&self.config.index_path())
    }

    pub fn save_index(&self, index: &Index) -> Result<()> {
        index.save(&self.config.index_path())
    }

    pub fn user_config(&self) -> Result<UserConfig> {
        UserConfig::load(&self.config.user_config_path())
    }

    /// Author for new commits, with the pinned date when one is configured.
    pub fn identity(&self) -> Result<Identity> {
        let (name, email) = self.user_config()?.user_info()?;

        Ok(match UserConfig::author_date() {
            Some(timestamp) => Identity::new_with_timestamp(name, email, timestamp),
            None => Identity::new(name, email),
        })
    }

    /// Store the workspace file at `path` as a blob and stage it.
    pub fn stage_file(&self, index: &mut Index, path: &str) -> Result<ObjectId> {
        let data = self.workspace.read_file(path)?;
        let stat = self.workspace.stat_file(path)?;
        let oid = self.database.store(&Blob::new(data))?;

        index.add_or_update(IndexEntry::from_stat(path, oid, stat));
        debug!(path, %oid, "staged file");

        Ok(oid)
    }

    pub fn build_tree(&self, index: &Index) -> Result<BuildOutcome> {
        TreeBuilder::new(&self.database).build(index.entries())
    }

    /// Leaves of the tree a commit (or tree) points at
    pub fn tree_map(&self, oid: &ObjectId) -> Result<PathMap> {
        let tree = self.database.peel_to_tree(oid)?;
        TreeWalker::new(&self.database).flatten(&tree)
    }

    /// Snapshot HEAD points at; empty on an unborn branch.
    pub fn head_tree(&self) -> Result<PathMap> {
        match self.refs.read_head()? {
            Some(oid) => self.tree_map(&oid),
            None => Ok(PathMap::new()),
        }
    }

    /// Write a commit object for `tree`. Fails with `NothingToCommit` when
    /// the first parent already snapshots the same tree.
    pub fn create_commit(&self, tree: ObjectId, parents: Vec<ObjectId>, message: &str) -> Result<(ObjectId, Commit)> {
        if let Some(parent) = parents.first() {
            let parent = self.database.load_commit(parent)?;
            if *parent.tree_oid() == tree {
                return Err(GelError::NothingToCommit);
            }
        }

        let message = format!("{}\n", message.trim());
        let commit = Commit::new(parents, tree, self.identity()?, message);
        let oid = self.database.store(&commit)?;
        debug!(%oid, %tree, "wrote commit");

        Ok((oid, commit))
    }

    /// Snapshot the index and advance HEAD to the new commit.
    pub fn commit_index(&self, message: &str) -> Result<CommitOutcome> {
        let index = self.load_index()?;
        let head = self.refs.read_head()?;
        if head.is_none() && index.is_empty() {
            return Err(GelError::NothingToCommit);
        }

        let tree = self.build_tree(&index)?;
        let (oid, commit) = self.create_commit(tree.root, head.into_iter().collect(), message)?;
        self.refs.update_head(&oid)?;

        let branch = self.refs.current_branch()?;
        info!(%oid, trees_written = tree.written, "committed index");

        Ok(CommitOutcome {
            oid,
            commit,
            branch,
        })
    }

    pub fn resolve_revision(&self, revision: &str) -> Result<ObjectId> {
        Revision::try_parse(revision)?.resolve(self)
    }

    /// Move the working directory, the index and HEAD to `target`.
    ///
    /// Local changes that the switch would overwrite abort it before any
    /// file is touched. Afterwards the index holds exactly the target tree;
    /// stat data is taken from the files just written, or kept from the old
    /// index where the entry did not change.
    pub fn switch_branch(&self, target: &BranchName) -> Result<SwitchOutcome> {
        if self.refs.current_branch()?.as_ref() == Some(target) {
            return Ok(SwitchOutcome::AlreadyOn);
        }

        let target_oid = self
            .refs
            .read_plain(&target.ref_path())?
            .ok_or_else(|| GelError::RefNotFound(target.to_string()))?;
        let target_tree = self.database.peel_to_tree(&target_oid)?;

        let changes = diff_path_maps(&self.head_tree()?, &self.tree_map(&target_tree)?);
        let old_index = self.load_index()?;

        let migration = Migration::new(&self.database, &self.workspace, changes);
        migration.check_conflicts(&old_index)?;
        let written = migration.apply()?;

        let target_entries = TreeWalker::new(&self.database).read_tree(&target_tree)?;
        let mut index = Index::from_entries(target_entries);
        for path in &written {
            index.update_entry_stat(path, self.workspace.stat_file(path)?);
        }
        for entry in old_index.entries() {
            if written.contains(&entry.path) {
                continue;
            }
            if let Some(new_entry) = index.find_entry(&entry.path)
                && new_entry.oid == entry.oid
                && new_entry.mode() == entry.mode()
            {
                index.update_entry_stat(&entry.path, entry.metadata);
            }
        }
        self.save_index(&index)?;
        self.refs.set_head_symbolic(target)?;

        let changed = migration.changes().len();
        info!(branch = %target, %target_oid, changed, "switched branch");

        Ok(SwitchOutcome::Switched { changed })
    }

    /// Compare HEAD, index and workspace, saving refreshed stat data.
    pub fn collect_status(&self) -> Result<StatusInfo> {
        let mut index = self.load_index()?;
        let status = Status::new(self).collect(&mut index)?;
        if status.index_refreshed {
            self.save_index(&index)?;
        }

        Ok(status)
    }

    /// Hash a blob for `data` without touching the store unless `write`.
    pub fn hash_blob(&self, data: bytes::Bytes, write: bool) -> Result<ObjectId> {
        let blob = Blob::new(data);
        if write {
            self.database.store(&blob)
        } else {
            blob.object_id()
        }
    }
}
