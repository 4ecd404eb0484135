use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::file_mode::FileMode;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;

const NULL_PATH: &str = "/dev/null";
const NULL_SHORT_OID: &str = "0000000";

pub type LineSet = Vec<String>;

/// One side of a file diff. A side with no oid stands for "file absent".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffTarget {
    pub path: String,
    pub oid: Option<ObjectId>,
    pub mode: Option<FileMode>,
    pub data: LineSet,
}

impl DiffTarget {
    /// Side backed by a stored blob (HEAD tree or index)
    pub fn from_entry(path: &str, entry: &DatabaseEntry, database: &Database) -> Result<Self> {
        let blob = database.load_blob(&entry.oid)?;

        Ok(DiffTarget {
            path: path.to_string(),
            oid: Some(entry.oid),
            mode: Some(entry.mode),
            data: blob.lines(),
        })
    }

    pub fn from_workspace(path: &str, workspace: &Workspace) -> Result<Self> {
        let blob = workspace.read_blob(path)?;
        let mode = workspace.stat_file(path)?.mode;

        Ok(DiffTarget {
            path: path.to_string(),
            oid: Some(blob.object_id()?),
            mode: Some(mode),
            data: blob.lines(),
        })
    }

    pub fn from_nothing(path: &str) -> Self {
        DiffTarget {
            path: path.to_string(),
            oid: None,
            mode: None,
            data: Vec::new(),
        }
    }

    /// Path for the `---`/`+++` header, with the given side prefix
    pub fn diff_path(&self, prefix: &str) -> String {
        match self.oid {
            Some(_) => format!("{prefix}/{}", self.path),
            None => NULL_PATH.to_string(),
        }
    }

    pub fn short_oid(&self) -> String {
        self.oid
            .map(|oid| oid.to_short_oid())
            .unwrap_or_else(|| NULL_SHORT_OID.to_string())
    }

    pub fn same_content(&self, other: &Self) -> bool {
        self.oid == other.oid
    }

    pub fn same_as(&self, other: &Self) -> bool {
        self.oid == other.oid && self.mode == other.mode
    }
}
