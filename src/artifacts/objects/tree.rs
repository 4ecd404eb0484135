//! Tree object
//!
//! Trees describe one directory level: an ordered list of entries pointing at
//! blobs (files), other trees (subdirectories) or commits (submodules).
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<32-byte-sha256>`, concatenated without separators.
//!
//! ## Ordering
//!
//! Entries are sorted by name, with directory names compared as if they ended
//! in `/`. So `lib.rs` sorts before the directory `lib`, which sorts before `lib0`.

use crate::artifacts::objects::file_mode::FileMode;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{GelError, Result};
use bytes::Bytes;
use derive_new::new;
use std::cmp::Ordering;
use std::io::{BufRead, Cursor};

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub oid: ObjectId,
    pub name: String,
}

impl TreeEntry {
    pub fn is_tree(&self) -> bool {
        self.mode.is_tree()
    }

    /// Canonical comparison: directories compare as `name/`
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        let left = self.name.bytes().chain(self.is_tree().then_some(b'/'));
        let right = other.name.bytes().chain(other.is_tree().then_some(b'/'));
        left.cmp(right)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree from entries in any order; entries are sorted canonically.
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(TreeEntry::canonical_cmp);
        Tree { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Unpackable for Tree {
    fn deserialize(bytes: Bytes) -> Result<Self> {
        let mut reader = Cursor::new(bytes);
        let mut entries = Vec::new();

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let n = reader
                .read_until(b' ', &mut mode_bytes)
                .map_err(|e| GelError::MalformedObject(e.to_string()))?;
            if n == 0 {
                break;
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(GelError::MalformedObject(
                    "unexpected end of tree in mode".into(),
                ));
            }
            let mode = std::str::from_utf8(&mode_bytes)
                .map_err(|_| GelError::MalformedObject("tree mode is not UTF-8".into()))?;
            let mode = FileMode::from_octal_str(mode)?;

            name_bytes.clear();
            reader
                .read_until(b'\0', &mut name_bytes)
                .map_err(|e| GelError::MalformedObject(e.to_string()))?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(GelError::MalformedObject(
                    "unexpected end of tree in entry name".into(),
                ));
            }
            let name = String::from_utf8(name_bytes.clone())
                .map_err(|_| GelError::MalformedObject("tree entry name is not UTF-8".into()))?;

            let oid = ObjectId::read_raw_from(&mut reader).map_err(|_| {
                GelError::MalformedObject(format!("truncated object id for entry {name}"))
            })?;

            entries.push(TreeEntry::new(mode, oid, name));
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn content(&self) -> Result<Bytes> {
        let mut content = Vec::new();

        for entry in &self.entries {
            content.extend_from_slice(entry.mode.as_str().as_bytes());
            content.push(b' ');
            content.extend_from_slice(entry.name.as_bytes());
            content.push(0);
            content.extend_from_slice(entry.oid.as_bytes());
        }

        Ok(Bytes::from(content))
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{:0>6} {} {}\t{}",
                    entry.mode.as_str(),
                    entry.mode.object_type(),
                    entry.oid,
                    entry.name
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
