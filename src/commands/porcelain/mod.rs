//! Porcelain commands
//!
//! - `init`: create the `.gel` directory
//! - `add`, `rm`: stage and unstage files
//! - `commit`: snapshot the index
//! - `log`: show history
//! - `branch`, `switch`: create, list, delete and check out branches
//! - `status`, `diff`: compare HEAD, index and workspace

pub mod add;
pub mod branch;
pub mod commit;
pub mod diff;
pub mod init;
pub mod log;
pub mod rm;
pub mod status;
pub mod switch;
