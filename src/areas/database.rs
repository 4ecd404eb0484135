//! Content-addressed object store
//!
//! Objects live zlib-compressed under `objects/<2 hex>/<62 hex>`. A hash that
//! is already on disk is never written again, and new objects go through a
//! temporary file plus `rename` so a reader sees either nothing or the whole
//! object.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, parse_envelope};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{GelError, IoContext, Result};
use bytes::Bytes;
use fake::rand;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Database { path: path.into() }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.path.join(oid.to_path())
    }

    pub fn exists(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }

    /// Persist an envelope under `oid`. Returns `false` when the object was
    /// already present and nothing was written.
    pub fn write_object(&self, oid: &ObjectId, envelope: &[u8]) -> Result<bool> {
        if self.exists(oid) {
            debug!(%oid, "object already stored");
            return Ok(false);
        }

        let object_path = self.object_path(oid);
        let object_dir = object_path
            .parent()
            .ok_or_else(|| GelError::InvalidPath(object_path.display().to_string()))?;
        std::fs::create_dir_all(object_dir).at_path(object_dir)?;

        let compressed = Self::compress(envelope).at_path(&object_path)?;
        let temp_path = object_dir.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .at_path(&temp_path)?;
        file.write_all(&compressed).at_path(&temp_path)?;
        drop(file);

        std::fs::rename(&temp_path, &object_path).at_path(&object_path)?;
        debug!(%oid, bytes = envelope.len(), "stored object");

        Ok(true)
    }

    /// Hash, then store an object. Returns its id.
    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        let envelope = object.envelope()?;
        let oid = ObjectId::hash(&envelope);
        self.write_object(&oid, &envelope)?;

        Ok(oid)
    }

    /// Raw, decompressed envelope bytes of an object
    pub fn read_object(&self, oid: &ObjectId) -> Result<Bytes> {
        let object_path = self.object_path(oid);
        let compressed = match std::fs::read(&object_path) {
            Ok(compressed) => compressed,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GelError::ObjectNotFound(oid.to_hex()));
            }
            Err(e) => return Err(GelError::io(object_path, e)),
        };

        Self::decompress(&compressed).map_err(|source| GelError::Decompression {
            oid: oid.to_hex(),
            source,
        })
    }

    pub fn parse_object(&self, oid: &ObjectId) -> Result<ObjectBox> {
        ObjectBox::parse(self.read_object(oid)?)
    }

    pub fn object_type(&self, oid: &ObjectId) -> Result<ObjectType> {
        let (object_type, _) = parse_envelope(self.read_object(oid)?)?;
        Ok(object_type)
    }

    pub fn load_blob(&self, oid: &ObjectId) -> Result<Blob> {
        match self.parse_object(oid)? {
            ObjectBox::Blob(blob) => Ok(blob),
            other => Err(unexpected(oid, ObjectType::Blob, other.object_type())),
        }
    }

    pub fn load_tree(&self, oid: &ObjectId) -> Result<Tree> {
        match self.parse_object(oid)? {
            ObjectBox::Tree(tree) => Ok(tree),
            other => Err(unexpected(oid, ObjectType::Tree, other.object_type())),
        }
    }

    pub fn load_commit(&self, oid: &ObjectId) -> Result<Commit> {
        match self.parse_object(oid)? {
            ObjectBox::Commit(commit) => Ok(commit),
            other => Err(unexpected(oid, ObjectType::Commit, other.object_type())),
        }
    }

    /// Peel a commit to its tree; a tree id is returned as is.
    pub fn peel_to_tree(&self, oid: &ObjectId) -> Result<ObjectId> {
        match self.parse_object(oid)? {
            ObjectBox::Tree(_) => Ok(*oid),
            ObjectBox::Commit(commit) => Ok(*commit.tree_oid()),
            ObjectBox::Blob(_) => Err(unexpected(oid, ObjectType::Tree, ObjectType::Blob)),
        }
    }

    fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn decompress(data: &[u8]) -> std::io::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;

        Ok(decompressed.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    /// Every stored object whose hex id starts with `prefix`.
    ///
    /// Prefixes of two or more characters only scan their fan-out directory.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        let dirs: Vec<String> = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            (0..=255u8).map(|i| format!("{i:02x}")).collect()
        };

        let mut matches = Vec::new();
        for dir_name in dirs {
            let dir_path = self.path.join(&dir_name);
            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path).at_path(&dir_path)? {
                let entry = entry.at_path(&dir_path)?;
                let full_oid = format!("{}{}", dir_name, entry.file_name().to_string_lossy());

                if full_oid.starts_with(&prefix) {
                    if let Ok(oid) = ObjectId::try_parse(&full_oid) {
                        matches.push(oid);
                    }
                }
            }
        }
        matches.sort();

        Ok(matches)
    }
}

fn unexpected(oid: &ObjectId, expected: ObjectType, actual: ObjectType) -> GelError {
    GelError::UnexpectedObjectType {
        oid: oid.to_hex(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::file_mode::FileMode;
    use crate::artifacts::objects::tree::TreeEntry;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn dir() -> TempDir {
        TempDir::new().unwrap()
    }

    #[rstest]
    fn stores_under_fan_out_path(dir: TempDir) {
        let database = Database::new(dir.path());
        let blob = Blob::new(Bytes::from_static(b"hello\n"));

        let oid = database.store(&blob).unwrap();
        let hex = oid.to_hex();

        assert!(dir.path().join(&hex[..2]).join(&hex[2..]).is_file());
        assert_eq!(database.load_blob(&oid).unwrap(), blob);
    }

    #[rstest]
    fn second_write_is_a_no_op(dir: TempDir) {
        let database = Database::new(dir.path());
        let envelope = Blob::new(Bytes::from_static(b"same")).envelope().unwrap();
        let oid = ObjectId::hash(&envelope);

        assert!(database.write_object(&oid, &envelope).unwrap());
        assert!(!database.write_object(&oid, &envelope).unwrap());
    }

    #[rstest]
    fn missing_object_is_not_found(dir: TempDir) {
        let database = Database::new(dir.path());
        let error = database.read_object(&ObjectId::hash(b"nothing")).unwrap_err();

        assert!(error.is_not_found());
    }

    #[rstest]
    fn garbage_on_disk_is_a_decompression_error(dir: TempDir) {
        let database = Database::new(dir.path());
        let oid = ObjectId::hash(b"broken");
        let path = dir.path().join(oid.to_path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"definitely not zlib").unwrap();

        assert!(matches!(
            database.read_object(&oid),
            Err(GelError::Decompression { .. })
        ));
    }

    #[rstest]
    fn typed_loads_reject_other_kinds(dir: TempDir) {
        let database = Database::new(dir.path());
        let blob_oid = database.store(&Blob::new(Bytes::from_static(b"x"))).unwrap();
        let tree = Tree::new(vec![TreeEntry::new(FileMode::Regular, blob_oid, "x".into())]);
        let tree_oid = database.store(&tree).unwrap();

        assert!(matches!(
            database.load_tree(&blob_oid),
            Err(GelError::UnexpectedObjectType { .. })
        ));
        assert_eq!(database.peel_to_tree(&tree_oid).unwrap(), tree_oid);
        assert_eq!(database.object_type(&tree_oid).unwrap(), ObjectType::Tree);
    }

    #[rstest]
    fn finds_objects_by_prefix(dir: TempDir) {
        let database = Database::new(dir.path());
        let oid = database.store(&Blob::new(Bytes::from_static(b"abc"))).unwrap();

        assert_eq!(database.find_objects_by_prefix(&oid.to_hex()[..6]).unwrap(), vec![oid]);
        assert_eq!(database.find_objects_by_prefix(&oid.to_hex()[..1]).unwrap(), vec![oid]);
        assert!(database.find_objects_by_prefix("zz").unwrap().is_empty());
    }
}
