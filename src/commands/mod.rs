//! Command implementations
//!
//! Commands are `impl Repository` blocks split the way Git splits them:
//!
//! - `plumbing`: direct access to objects, the index and refs
//! - `porcelain`: everyday workflows built on the engine operations
//!
//! Every command writes its output to the repository writer and reports
//! failures through `anyhow`, with the typed engine error kept as the source.

pub mod plumbing;
pub mod porcelain;
