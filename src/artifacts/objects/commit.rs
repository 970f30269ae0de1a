//! Commit object
//!
//! Commits link a tree (directory snapshot) to zero, one, or two parent
//! commits plus authorship metadata.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0tree <tree-oid>
//! parent <parent-oid>          ; zero, one, or two lines
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```
//!
//! Merge commits list the `ours` parent first, `theirs` second. The message
//! carries exactly one trailing newline on disk.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::io::BufRead;

/// Author or committer information
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    /// Create a new author stamped with the current local time
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Load author identity from the environment
    ///
    /// Reads `KIT_AUTHOR_NAME` and `KIT_AUTHOR_EMAIL`, falling back to a
    /// placeholder identity when unset. `KIT_AUTHOR_DATE` pins the timestamp
    /// (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`), which keeps commits
    /// reproducible in tests.
    pub fn load_from_env() -> Self {
        let name = std::env::var("KIT_AUTHOR_NAME").unwrap_or_else(|_| "Kit User".to_string());
        let email =
            std::env::var("KIT_AUTHOR_EMAIL").unwrap_or_else(|_| "kit@localhost".to_string());

        let timestamp = std::env::var("KIT_AUTHOR_DATE").ok().and_then(|date_str| {
            chrono::DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Author::new_with_timestamp(name, email, ts),
            None => Author::new(name, email),
        }
    }

    /// Format as a header value: `Name <email> <unix-secs> <±HHMM>`
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// Format the timestamp for human-readable log output
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }
}

/// Parse a `±HHMM` timezone offset
fn parse_offset(timezone: &str) -> anyhow::Result<chrono::FixedOffset> {
    let bad_offset = || anyhow::anyhow!("invalid author timezone: {}", timezone);

    if timezone.len() != 5 {
        return Err(bad_offset());
    }
    let sign = match &timezone[..1] {
        "+" => 1,
        "-" => -1,
        _ => return Err(bad_offset()),
    };
    let hours: i32 = timezone[1..3].parse().map_err(|_| bad_offset())?;
    let minutes: i32 = timezone[3..5].parse().map_err(|_| bad_offset())?;

    chrono::FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(bad_offset)
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Format: "name <email> timestamp timezone"
        // Split from the right so names may contain spaces
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(anyhow::anyhow!("invalid author format: {}", value));
        }

        let timezone = parts[0];
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("invalid author timestamp: {}", parts[1]))?;
        let name_email_part = parts[2];

        let email_start = name_email_part
            .find('<')
            .ok_or_else(|| anyhow::anyhow!("invalid author format: missing '<'"))?;
        let email_end = name_email_part
            .find('>')
            .ok_or_else(|| anyhow::anyhow!("invalid author format: missing '>'"))?;

        let name = name_email_part[..email_start].trim().to_string();
        let email = name_email_part[email_start + 1..email_end].to_string();

        let offset = parse_offset(timezone)?;
        let datetime = chrono::DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| anyhow::anyhow!("invalid author timestamp: {}", timestamp))?
            .with_timezone(&offset);

        Ok(Author {
            name,
            email,
            timestamp: datetime,
        })
    }
}

/// Commit object
///
/// Represents a snapshot of the repository with metadata: the tree holding
/// the file state, parent commit(s) for history, authorship, and a message.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit ids (empty for the root commit, two for merges)
    parents: Vec<ObjectId>,
    /// Tree object id representing the directory snapshot
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// Create a new commit; the author doubles as the committer
    pub fn new(
        parents: Vec<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: String,
    ) -> Self {
        Commit {
            parents,
            tree_oid,
            author: author.clone(),
            committer: author,
            message,
        }
    }

    pub fn new_with_committer(
        parents: Vec<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        committer: Author,
        message: String,
    ) -> Self {
        Commit {
            parents,
            tree_oid,
            author,
            committer,
            message,
        }
    }

    /// First line of the message, for short-form display
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
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

    /// First parent, if any
    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }

    fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("tree {}", self.tree_oid.as_ref())];
        for parent in &self.parents {
            lines.push(format!("parent {}", parent.as_ref()));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));

        lines
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content = self.header_lines().join("\n");
        content.push('\n');
        content.push('\n');
        content.push_str(&self.message);
        if !content.ends_with('\n') {
            content.push('\n');
        }

        Ok(frame(self.object_type(), content.as_bytes()))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)?;

        let (headers, message) = content
            .split_once("\n\n")
            .context("invalid commit object: missing blank line")?;

        let mut tree_oid = None;
        let mut parents = Vec::new();
        let mut author = None;
        let mut committer = None;

        for line in headers.lines() {
            if let Some(oid) = line.strip_prefix("tree ") {
                tree_oid = Some(ObjectId::try_parse(oid.to_string())?);
            } else if let Some(oid) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(oid.to_string())?);
            } else if let Some(ident) = line.strip_prefix("author ") {
                author = Some(Author::try_from(ident)?);
            } else if let Some(ident) = line.strip_prefix("committer ") {
                committer = Some(Author::try_from(ident)?);
            } else {
                anyhow::bail!("invalid commit object: unrecognized header '{}'", line);
            }
        }

        let tree_oid = tree_oid.context("invalid commit object: missing tree line")?;
        let author = author.context("invalid commit object: missing author line")?;
        let committer = committer.context("invalid commit object: missing committer line")?;

        // trim exactly one trailing newline from the message
        let message = message.strip_suffix('\n').unwrap_or(message).to_string();

        Ok(Self::new_with_committer(
            parents, tree_oid, author, committer, message,
        ))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = self.header_lines();
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}
