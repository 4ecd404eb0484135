//! Commit object
//!
//! Commits anchor a tree snapshot into history. They contain:
//! - A tree object ID (directory snapshot)
//! - Parent commit ID(s) (none for the first commit of a branch)
//! - Author and committer identities
//! - Commit message
//!
//! ## Format
//!
//! Line order is part of the format:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>        (zero or more)
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{GelError, Result};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};

/// Author or committer information
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Identity {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

impl Identity {
    /// Identity stamped with the current local time
    pub fn new(name: String, email: String) -> Self {
        Identity {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Identity {
            name,
            email,
            timestamp,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// "Name <email>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// "Name <email> 1700000000 +0200", as stored in the object
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }
}

fn parse_timezone(timezone: &str) -> Option<FixedOffset> {
    let (sign, digits) = match timezone.as_bytes().first()? {
        b'+' => (1, &timezone[1..]),
        b'-' => (-1, &timezone[1..]),
        _ => return None,
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

impl TryFrom<&str> for Identity {
    type Error = GelError;

    fn try_from(value: &str) -> Result<Self> {
        let malformed = |what: &str| GelError::MalformedObject(format!("invalid identity: {what}"));

        // Split from the right: timezone and timestamp never contain spaces
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(malformed(value));
        }

        let offset = parse_timezone(parts[0]).ok_or_else(|| malformed("timezone"))?;
        let seconds = parts[1]
            .parse::<i64>()
            .map_err(|_| malformed("timestamp"))?;
        let name_email = parts[2];

        let email_start = name_email.rfind('<').ok_or_else(|| malformed("missing '<'"))?;
        let email_end = name_email.rfind('>').ok_or_else(|| malformed("missing '>'"))?;
        if email_end < email_start {
            return Err(malformed("email brackets out of order"));
        }

        let name = name_email[..email_start].trim_end().to_string();
        let email = name_email[email_start + 1..email_end].to_string();

        let timestamp = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| malformed("timestamp out of range"))?
            .with_timezone(&offset);

        Ok(Identity {
            name,
            email,
            timestamp,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs (empty for an initial commit, several for merges)
    parents: Vec<ObjectId>,
    tree_oid: ObjectId,
    author: Identity,
    committer: Identity,
    message: String,
}

impl Commit {
    /// Create a commit whose committer is the author
    pub fn new(parents: Vec<ObjectId>, tree_oid: ObjectId, author: Identity, message: String) -> Self {
        Commit {
            parents,
            tree_oid,
            committer: author.clone(),
            author,
            message,
        }
    }

    /// First line of the message, for one-line displays
    pub fn title_line(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn author(&self) -> &Identity {
        &self.author
    }

    pub fn committer(&self) -> &Identity {
        &self.committer
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.committer.timestamp()
    }

    fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        for parent in &self.parents {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines
    }
}

impl Unpackable for Commit {
    fn deserialize(bytes: Bytes) -> Result<Self> {
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| GelError::MalformedObject("commit is not UTF-8".into()))?;

        let (headers, message) = content
            .split_once("\n\n")
            .ok_or_else(|| GelError::MalformedObject("commit has no message separator".into()))?;
        let mut lines = headers.lines().peekable();

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .ok_or_else(|| GelError::MalformedObject("commit is missing its tree line".into()))?;
        let tree_oid = ObjectId::try_parse(tree_oid)?;

        let mut parents = Vec::new();
        while let Some(parent) = lines.peek().and_then(|line| line.strip_prefix("parent ")) {
            parents.push(ObjectId::try_parse(parent)?);
            lines.next();
        }

        let author = lines
            .next()
            .and_then(|line| line.strip_prefix("author "))
            .ok_or_else(|| GelError::MalformedObject("commit is missing its author line".into()))?;
        let author = Identity::try_from(author)?;

        let committer = lines
            .next()
            .and_then(|line| line.strip_prefix("committer "))
            .ok_or_else(|| {
                GelError::MalformedObject("commit is missing its committer line".into())
            })?;
        let committer = Identity::try_from(committer)?;

        if let Some(extra) = lines.next() {
            return Err(GelError::MalformedObject(format!(
                "unexpected commit header: {extra}"
            )));
        }

        Ok(Commit {
            parents,
            tree_oid,
            author,
            committer,
            message: message.to_string(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn content(&self) -> Result<Bytes> {
        let mut content = self.header_lines().join("\n");
        content.push_str("\n\n");
        content.push_str(&self.message);

        Ok(Bytes::from(content))
    }

    fn display(&self) -> String {
        let mut lines = self.header_lines();
        lines.push(String::new());
        lines.push(self.message.trim_end_matches('\n').to_string());
        lines.join("\n")
    }
}
