//! Repository and user configuration
//!
//! `RepositoryConfig` is built once from the working directory and handed to
//! every area constructor, so nothing looks paths up behind the caller's back.
//! `UserConfig` mirrors `.gel/config.toml` and answers "who is committing".

use crate::errors::{GelError, IoContext, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the metadata directory inside the working tree
pub const GEL_DIR: &str = ".gel";

/// Default branch created by `init`
pub const DEFAULT_BRANCH: &str = "master";

const AUTHOR_NAME_ENV: &str = "GEL_AUTHOR_NAME";
const AUTHOR_EMAIL_ENV: &str = "GEL_AUTHOR_EMAIL";
const AUTHOR_DATE_ENV: &str = "GEL_AUTHOR_DATE";

/// Every on-disk location a repository needs, derived from its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    root: PathBuf,
    gel_dir: PathBuf,
}

impl RepositoryConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let gel_dir = root.join(GEL_DIR);
        RepositoryConfig { root, gel_dir }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn gel_dir(&self) -> &Path {
        &self.gel_dir
    }

    pub fn objects_path(&self) -> PathBuf {
        self.gel_dir.join("objects")
    }

    pub fn index_path(&self) -> PathBuf {
        self.gel_dir.join("index")
    }

    pub fn head_path(&self) -> PathBuf {
        self.gel_dir.join("HEAD")
    }

    pub fn refs_path(&self) -> PathBuf {
        self.gel_dir.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }

    pub fn user_config_path(&self) -> PathBuf {
        self.gel_dir.join("config.toml")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSection {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Contents of `.gel/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub user: UserSection,
}

impl UserConfig {
    /// Load the config file. A missing file yields an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).at_path(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| GelError::Config(e.to_string()))
    }

    /// Resolve `(name, email)`, environment first, then the file.
    pub fn user_info(&self) -> Result<(String, String)> {
        let name = std::env::var(AUTHOR_NAME_ENV)
            .ok()
            .or_else(|| self.user.name.clone())
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| GelError::Config("user.name is not set".to_string()))?;
        let email = std::env::var(AUTHOR_EMAIL_ENV)
            .ok()
            .or_else(|| self.user.email.clone())
            .filter(|email| !email.trim().is_empty())
            .ok_or_else(|| GelError::Config("user.email is not set".to_string()))?;

        Ok((name, email))
    }

    /// Pinned commit time from the environment, if any.
    pub fn author_date() -> Option<chrono::DateTime<chrono::FixedOffset>> {
        std::env::var(AUTHOR_DATE_ENV).ok().and_then(|date| {
            chrono::DateTime::parse_from_rfc2822(&date)
                .or_else(|_| chrono::DateTime::parse_from_str(&date, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn derives_every_path_from_root() {
        let config = RepositoryConfig::new("/tmp/project");

        assert_eq!(config.gel_dir(), Path::new("/tmp/project/.gel"));
        assert_eq!(config.objects_path(), PathBuf::from("/tmp/project/.gel/objects"));
        assert_eq!(config.heads_path(), PathBuf::from("/tmp/project/.gel/refs/heads"));
        assert_eq!(
            config.user_config_path(),
            PathBuf::from("/tmp/project/.gel/config.toml")
        );
    }

    #[test]
    fn parses_user_section() {
        let config = UserConfig::parse("[user]\nname = \"Ada\"\nemail = \"ada@example.com\"\n")
            .unwrap();

        assert_eq!(config.user.name.as_deref(), Some("Ada"));
        assert_eq!(config.user.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            UserConfig::parse("[user\nname = 1"),
            Err(GelError::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_empty_config() {
        let dir = assert_fs::TempDir::new().unwrap();
        let config = UserConfig::load(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, UserConfig::default());
    }
}
