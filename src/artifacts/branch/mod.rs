//! Branch names and revision expressions

pub mod branch_name;
pub mod revision;

/// Anything matching this is not a usable branch name
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
pub const PARENT_REGEX: &str = r"^(.+)\^$";
pub const ANCESTOR_REGEX: &str = r"^(.+)\~(\d+)$";
pub const REF_ALIASES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "@" => "HEAD",
};

/// Name of the symbolic ref that tracks the checked-out branch
pub const HEAD: &str = "HEAD";

/// Prefix every writable ref lives under
pub const REFS_PREFIX: &str = "refs/";

/// Prefix of branch refs
pub const HEADS_PREFIX: &str = "refs/heads/";
