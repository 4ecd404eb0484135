//! Blob object
//!
//! Blobs store raw file content without any metadata; names and modes live in
//! the trees that point at them.
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::Result;
use bytes::Bytes;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    data: Bytes,
}

impl Blob {
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Content split into lines for diffing, without trailing newlines
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.data)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Unpackable for Blob {
    fn deserialize(bytes: Bytes) -> Result<Self> {
        Ok(Self::new(bytes))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn content(&self) -> Result<Bytes> {
        Ok(self.data.clone())
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hashes_the_envelope_not_the_payload() {
        let blob = Blob::new(Bytes::from_static(b"hello"));

        assert_eq!(&blob.envelope().unwrap()[..], b"blob 5\0hello");
        assert_ne!(
            blob.object_id().unwrap(),
            crate::artifacts::objects::object_id::ObjectId::hash(b"hello")
        );
    }

    #[test]
    fn keeps_binary_content_intact() {
        let data = Bytes::from_static(&[0, 159, 146, 150, 10]);
        let blob = Blob::deserialize(data.clone()).unwrap();

        assert_eq!(blob.content().unwrap(), data);
        assert_eq!(blob.size(), 5);
    }
}
