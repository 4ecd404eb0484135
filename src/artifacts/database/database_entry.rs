use crate::artifacts::objects::file_mode::FileMode;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, new)]
pub struct DatabaseEntry {
    pub oid: ObjectId,
    pub mode: FileMode,
}

impl DatabaseEntry {
    pub fn is_tree(&self) -> bool {
        self.mode.is_tree()
    }
}

/// Flat `path -> (oid, mode)` view of a snapshot, ordered by path
pub type PathMap = BTreeMap<String, DatabaseEntry>;
