use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;

/// What `cat-file` prints about an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileMode {
    /// Content, pretty-printed by type
    Pretty,
    Type,
    Size,
}

impl Repository {
    pub fn cat_file(&self, revision: &str, mode: CatFileMode) -> anyhow::Result<()> {
        let oid = self.resolve_revision(revision)?;
        let object = self.database().parse_object(&oid)?;

        match mode {
            CatFileMode::Type => writeln!(self.writer(), "{}", object.object_type())?,
            CatFileMode::Size => writeln!(self.writer(), "{}", object.content_size()?)?,
            // blobs go out byte for byte
            CatFileMode::Pretty => match &object {
                ObjectBox::Blob(blob) => self.writer().write_all(blob.data())?,
                other => writeln!(self.writer(), "{}", other.display())?,
            },
        }

        Ok(())
    }
}
