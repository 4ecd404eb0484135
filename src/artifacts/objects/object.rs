//! Shared object envelope and the tagged object union
//!
//! ```text
//! <type> <decimal byte length>\0<content>
//! ```
//!
//! The declared length must equal the content length exactly; anything else
//! is reported as a size mismatch, never truncated or padded.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{GelError, Result};
use bytes::Bytes;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(bytes: Bytes) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object {
    fn object_type(&self) -> ObjectType;

    /// Raw content, without the envelope
    fn content(&self) -> Result<Bytes>;

    fn display(&self) -> String;

    /// Full envelope bytes
    fn envelope(&self) -> Result<Bytes> {
        Ok(wrap_envelope(self.object_type(), &self.content()?))
    }

    fn object_id(&self) -> Result<ObjectId> {
        Ok(ObjectId::hash(&self.envelope()?))
    }
}

pub fn wrap_envelope(object_type: ObjectType, content: &[u8]) -> Bytes {
    let header = format!("{} {}\0", object_type.as_str(), content.len());

    let mut envelope = Vec::with_capacity(header.len() + content.len());
    envelope.extend_from_slice(header.as_bytes());
    envelope.extend_from_slice(content);

    Bytes::from(envelope)
}

/// Split an envelope into its type and content, validating the header.
pub fn parse_envelope(envelope: Bytes) -> Result<(ObjectType, Bytes)> {
    let space = envelope
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| GelError::MalformedObject("missing space after object type".into()))?;
    let type_name = std::str::from_utf8(&envelope[..space])
        .map_err(|_| GelError::MalformedObject("object type is not UTF-8".into()))?;
    let object_type = ObjectType::try_from(type_name)?;

    let nul = envelope[space + 1..]
        .iter()
        .position(|&b| b == 0)
        .map(|offset| space + 1 + offset)
        .ok_or_else(|| GelError::MalformedObject("missing NUL after object size".into()))?;
    let size = std::str::from_utf8(&envelope[space + 1..nul])
        .ok()
        .filter(|size| !size.is_empty() && size.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|size| size.parse::<usize>().ok())
        .ok_or_else(|| GelError::MalformedObject("object size is not a decimal number".into()))?;

    let content = envelope.slice(nul + 1..);
    if content.len() != size {
        return Err(GelError::ObjectSizeMismatch {
            declared: size,
            actual: content.len(),
        });
    }

    Ok((object_type, content))
}

/// A parsed object of any kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectBox {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
}

impl ObjectBox {
    pub fn parse(envelope: Bytes) -> Result<Self> {
        let (object_type, content) = parse_envelope(envelope)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Blob::deserialize(content)?)),
            ObjectType::Tree => Ok(ObjectBox::Tree(Tree::deserialize(content)?)),
            ObjectType::Commit => Ok(ObjectBox::Commit(Commit::deserialize(content)?)),
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(_) => ObjectType::Blob,
            ObjectBox::Tree(_) => ObjectType::Tree,
            ObjectBox::Commit(_) => ObjectType::Commit,
        }
    }

    pub fn display(&self) -> String {
        match self {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
        }
    }

    pub fn content_size(&self) -> Result<usize> {
        Ok(match self {
            ObjectBox::Blob(blob) => blob.size(),
            ObjectBox::Tree(tree) => tree.content()?.len(),
            ObjectBox::Commit(commit) => commit.content()?.len(),
        })
    }
}
