use crate::artifacts::branch::{HEADS_PREFIX, INVALID_BRANCH_NAME_REGEX};
use crate::errors::{GelError, Result};

/// A validated short branch name such as `main` or `feature/login`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(GelError::InvalidBranchName("branch name cannot be empty".into()));
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .map_err(|e| GelError::InvalidBranchName(e.to_string()))?;
        if re.is_match(&name) {
            return Err(GelError::InvalidBranchName(name));
        }

        Ok(Self(name))
    }

    /// Recover the branch from a full ref path like `refs/heads/main`
    pub fn try_from_ref_path(ref_path: &str) -> Result<Self> {
        let name = ref_path
            .strip_prefix(HEADS_PREFIX)
            .ok_or_else(|| GelError::InvalidBranchName(ref_path.to_string()))?;
        Self::try_parse(name)
    }

    /// `refs/heads/<name>`
    pub fn ref_path(&self) -> String {
        format!("{HEADS_PREFIX}{}", self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
