//! Error taxonomy for the storage engine
//!
//! Errors fall into four families:
//!
//! - **Format**: bytes on disk do not follow the expected layout
//! - **Integrity**: layout is fine but a size or checksum disagrees
//! - **Not found**: a probed object, ref or path does not exist
//! - **Domain**: an operation would violate a repository invariant
//!
//! Storage functions return these untouched. Commands wrap them in `anyhow`
//! and may add context, but corruption-class errors are never swallowed.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GelError>;

#[derive(Error, Debug)]
pub enum GelError {
    // format
    #[error("malformed object: {0}")]
    MalformedObject(String),

    #[error("invalid object type: {0}")]
    InvalidObjectType(String),

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("invalid file mode: {0}")]
    InvalidFileMode(String),

    #[error("invalid index signature: {0:?}")]
    InvalidIndexSignature([u8; 4]),

    #[error("unsupported index version: {0}")]
    UnsupportedIndexVersion(u32),

    #[error("truncated index: {0}")]
    TruncatedIndex(String),

    #[error("index entry path is not null-terminated")]
    UnterminatedPath,

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("malformed ref {0}")]
    MalformedRef(String),

    #[error("invalid path pattern: {0}")]
    InvalidPattern(String),

    // integrity
    #[error("object size mismatch: header declares {declared} bytes, payload has {actual}")]
    ObjectSizeMismatch { declared: usize, actual: usize },

    #[error("index checksum mismatch: stored {stored}, computed {computed}")]
    IndexChecksumMismatch { stored: String, computed: String },

    #[error("unable to decompress object {oid}: {source}")]
    Decompression {
        oid: String,
        #[source]
        source: std::io::Error,
    },

    // not found
    #[error("object {0} not found")]
    ObjectNotFound(String),

    #[error("ref {0} not found")]
    RefNotFound(String),

    #[error("path {} not found in tree {tree}", path.display())]
    PathNotInTree { tree: String, path: PathBuf },

    // domain
    #[error("nothing to commit, working tree clean")]
    NothingToCommit,

    #[error("a branch named '{0}' already exists")]
    BranchAlreadyExists(String),

    #[error("cannot delete branch '{0}' while it is checked out")]
    CannotDeleteCurrentBranch(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("short object id {prefix} is ambiguous, candidates: {}", candidates.join(", "))]
    AmbiguousObjectId {
        prefix: String,
        candidates: Vec<String>,
    },

    #[error("{0}\nAborting")]
    SwitchConflict(String),

    #[error("invalid revision: {0}")]
    InvalidRevision(String),

    #[error("refusing to write ref {0} outside of refs/")]
    RefOutsideNamespace(String),

    #[error("object {oid} is a {actual}, expected a {expected}")]
    UnexpectedObjectType {
        oid: String,
        expected: String,
        actual: String,
    },

    #[error("invalid user configuration: {0}")]
    Config(String),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GelError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GelError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors an existence probe may recover from.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GelError::ObjectNotFound(_) | GelError::RefNotFound(_) | GelError::PathNotInTree { .. }
        )
    }
}

/// Attach a path to an `std::io::Error`.
pub(crate) trait IoContext<T> {
    fn at_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoContext<T> for std::result::Result<T, std::io::Error> {
    fn at_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| GelError::io(path, source))
    }
}
