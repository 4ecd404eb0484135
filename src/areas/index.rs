//! Staging area
//!
//! The index tracks which content goes into the next commit. It is read
//! whole, mutated in memory and written back whole; there is no partial
//! update of the file.
//!
//! ## Ordering
//!
//! Entries are kept sorted by path bytes, so encoding the same logical index
//! always yields the same bytes. Replacing an entry keeps its slot.
//!
//! ## Locking
//!
//! `load` holds a shared lock while reading and `save` an exclusive lock while
//! writing, so a reader never observes a half-written file.

use crate::artifacts::index::checksum::{ChecksumReader, ChecksumWriter};
use crate::artifacts::index::entry_flags::{EntryFlags, MAX_NAME_LENGTH};
use crate::artifacts::index::index_entry::{
    ENTRY_FIXED_SIZE, EntryMetadata, IndexEntry, padded_entry_size,
};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::{GelError, IoContext, Result};
use byteorder::{ByteOrder, NetworkEndian};
use bytes::Bytes;
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    entries: Vec<IndexEntry>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index holding exactly the given entries, sorted by path
    pub fn from_entries(entries: impl IntoIterator<Item = IndexEntry>) -> Self {
        let mut index = Self::new();
        index.replace_all(entries);
        index
    }

    /// Read the index file. A missing or empty file is an empty index.
    pub fn load(path: &Path) -> Result<Self> {
        let mut file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no index file yet");
                return Ok(Self::new());
            }
            Err(e) => return Err(GelError::io(path, e)),
        };
        let mut lock = file_guard::lock(&mut file, file_guard::Lock::Shared, 0, 1).at_path(path)?;

        let mut bytes = Vec::new();
        lock.deref_mut().read_to_end(&mut bytes).at_path(path)?;

        let index = Self::decode(&bytes)?;
        debug!(path = %path.display(), entries = index.len(), "loaded index");

        Ok(index)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.encode()?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .at_path(path)?;
        let mut lock =
            file_guard::lock(&mut file, file_guard::Lock::Exclusive, 0, 1).at_path(path)?;

        let file = lock.deref_mut();
        file.set_len(0).at_path(path)?;
        file.write_all(&bytes).at_path(path)?;
        file.sync_all().at_path(path)?;

        debug!(path = %path.display(), entries = self.len(), "saved index");
        Ok(())
    }

    /// Serialize to the on-disk format, checksum included.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = ChecksumWriter::new();

        let header = IndexHeader::new(SIGNATURE, VERSION, self.entries.len() as u32);
        writer.write(&header.serialize()?);
        for entry in &self.entries {
            writer.write(&entry.serialize()?);
        }

        Ok(writer.finish())
    }

    /// Parse the on-disk format, verifying the trailing checksum.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Ok(Self::new());
        }

        let mut reader = ChecksumReader::new(bytes);
        let header = IndexHeader::deserialize(Bytes::copy_from_slice(reader.read(HEADER_SIZE)?))?;

        let mut entries = Vec::new();
        for _ in 0..header.entries_count {
            entries.push(Self::decode_entry(&mut reader)?);
        }
        reader.verify()?;

        Ok(Index { entries })
    }

    /// Find the entry boundary from the path length in its flags, then decode it.
    fn decode_entry(reader: &mut ChecksumReader) -> Result<IndexEntry> {
        let remaining = reader.peek_remaining();
        if remaining.len() < ENTRY_FIXED_SIZE {
            return Err(GelError::TruncatedIndex(format!(
                "entry header needs {} bytes, {} left",
                ENTRY_FIXED_SIZE,
                remaining.len()
            )));
        }

        let flags = EntryFlags::from_bits_retain(NetworkEndian::read_u16(
            &remaining[ENTRY_FIXED_SIZE - 2..ENTRY_FIXED_SIZE],
        ));
        let name_length = match flags.name_length() {
            MAX_NAME_LENGTH => remaining[ENTRY_FIXED_SIZE..]
                .iter()
                .position(|&b| b == 0)
                .ok_or(GelError::UnterminatedPath)?,
            length => length,
        };

        let entry_bytes = reader.read(padded_entry_size(name_length))?;
        if entry_bytes[ENTRY_FIXED_SIZE + name_length] != 0 {
            return Err(GelError::UnterminatedPath);
        }

        let entry = IndexEntry::deserialize(Bytes::copy_from_slice(entry_bytes))?;
        if entry.path.len() != name_length {
            return Err(GelError::InvalidPath(format!(
                "{} disagrees with its recorded length {}",
                entry.path, name_length
            )));
        }

        Ok(entry)
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, path: &str) -> std::result::Result<usize, usize> {
        self.entries
            .binary_search_by(|entry| entry.path.as_str().cmp(path))
    }

    pub fn find_entry(&self, path: &str) -> Option<&IndexEntry> {
        self.position(path).ok().map(|at| &self.entries[at])
    }

    /// Entries at or below `dir`; `""` and `"."` select everything.
    pub fn find_entries_by_prefix(&self, dir: &str) -> Vec<&IndexEntry> {
        let dir = dir.trim_end_matches('/');
        if dir.is_empty() || dir == "." {
            return self.entries.iter().collect();
        }

        self.entries
            .iter()
            .filter(|entry| is_at_or_below(&entry.path, dir))
            .collect()
    }

    /// Entries whose path matches a shell glob such as `src/*.rs`
    pub fn find_entries_by_pattern(&self, pattern: &str) -> Result<Vec<&IndexEntry>> {
        let pattern = glob::Pattern::new(pattern)
            .map_err(|e| GelError::InvalidPattern(format!("{pattern}: {e}")))?;

        Ok(self
            .entries
            .iter()
            .filter(|entry| pattern.matches(&entry.path))
            .collect())
    }

    /// True when some entry lives below `dir`
    pub fn is_tracked_dir(&self, dir: &str) -> bool {
        let prefix = format!("{dir}/");
        let start = self.entries.partition_point(|entry| entry.path.as_str() < prefix.as_str());
        self.entries
            .get(start)
            .is_some_and(|entry| entry.path.starts_with(&prefix))
    }

    /// Insert or replace the entry for `entry.path`.
    ///
    /// An existing entry keeps its position. Entries that would clash with the
    /// new one, a file where it needs a directory or files below a path that
    /// is now a file, are dropped first.
    pub fn add_or_update(&mut self, entry: IndexEntry) {
        self.discard_conflicts(&entry);

        match self.position(&entry.path) {
            Ok(at) => self.entries[at] = entry,
            Err(at) => self.entries.insert(at, entry),
        }
    }

    fn discard_conflicts(&mut self, entry: &IndexEntry) {
        let parents: Vec<String> = entry.parent_dirs().into_iter().map(String::from).collect();
        let children = format!("{}/", entry.path);

        self.entries.retain(|existing| {
            !parents.contains(&existing.path) && !existing.path.starts_with(&children)
        });
    }

    /// Remove `path` itself and everything below it. Returns how many entries went.
    pub fn remove(&mut self, path: &str) -> usize {
        let path = path.trim_end_matches('/');
        let before = self.entries.len();
        self.entries
            .retain(|entry| !is_at_or_below(&entry.path, path));

        before - self.entries.len()
    }

    /// Refresh the stat data of an entry whose content is unchanged.
    pub fn update_entry_stat(&mut self, path: &str, metadata: EntryMetadata) {
        if let Ok(at) = self.position(path) {
            self.entries[at].metadata = metadata;
        }
    }

    /// Replace the whole content of the index.
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = IndexEntry>) {
        self.entries = entries.into_iter().collect();
        self.entries.sort_by(|a, b| a.path.cmp(&b.path));
        self.entries.dedup_by(|later, earlier| later.path == earlier.path);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn is_at_or_below(path: &str, dir: &str) -> bool {
    path == dir
        || path
            .strip_prefix(dir)
            .is_some_and(|rest| rest.starts_with('/'))
}
