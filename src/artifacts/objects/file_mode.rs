//! Entry modes shared by tree entries and index entries

use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{GelError, Result};

#[derive(Debug, Clone, Copy, Eq, Hash, Ord, Default, PartialEq, PartialOrd)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
    Symlink,
    Directory,
    Submodule,
}

impl FileMode {
    /// Canonical mode string as written inside tree objects
    pub fn as_str(&self) -> &'static str {
        match self {
            FileMode::Regular => "100644",
            FileMode::Executable => "100755",
            FileMode::Symlink => "120000",
            FileMode::Directory => "40000",
            FileMode::Submodule => "160000",
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            FileMode::Regular => 0o100644,
            FileMode::Executable => 0o100755,
            FileMode::Symlink => 0o120000,
            FileMode::Directory => 0o40000,
            FileMode::Submodule => 0o160000,
        }
    }

    /// Parse a mode string; `040000` is accepted as a directory.
    pub fn from_octal_str(mode: &str) -> Result<Self> {
        match mode {
            "100644" => Ok(FileMode::Regular),
            "100755" => Ok(FileMode::Executable),
            "120000" => Ok(FileMode::Symlink),
            "40000" | "040000" => Ok(FileMode::Directory),
            "160000" => Ok(FileMode::Submodule),
            _ => Err(GelError::InvalidFileMode(mode.to_string())),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            FileMode::Regular | FileMode::Executable | FileMode::Symlink => ObjectType::Blob,
            FileMode::Directory => ObjectType::Tree,
            FileMode::Submodule => ObjectType::Commit,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, FileMode::Directory)
    }
}

impl TryFrom<u32> for FileMode {
    type Error = GelError;

    fn try_from(mode: u32) -> Result<Self> {
        match mode {
            0o100644 => Ok(FileMode::Regular),
            0o100755 => Ok(FileMode::Executable),
            0o120000 => Ok(FileMode::Symlink),
            0o40000 => Ok(FileMode::Directory),
            0o160000 => Ok(FileMode::Submodule),
            _ => Err(GelError::InvalidFileMode(format!("{mode:o}"))),
        }
    }
}

impl From<FileMode> for u32 {
    fn from(mode: FileMode) -> Self {
        mode.as_u32()
    }
}

impl std::fmt::Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
