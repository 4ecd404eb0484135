//! Working tree status
//!
//! Every tracked path is compared twice: HEAD tree against the index (staged
//! changes) and index against the working directory (unstaged changes). Files
//! the index does not know about are reported as untracked.
//!
//! - `file_change`: change kinds for both comparisons
//! - `inspector`: the comparisons themselves and the workspace scan
//! - `status_info`: the aggregated report

pub mod file_change;
pub mod inspector;
pub mod status_info;
