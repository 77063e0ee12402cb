use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Stable identity of a directory entry across snapshots: the resolved
/// absolute base path plus the entry's path relative to that base.
///
/// `rel` is posix-style (`/`-separated) and carries a trailing `/` when the
/// entry is a directory. The trailing slash is part of the identity and must
/// stay stable from one tick to the next.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId {
    pub base: PathBuf,
    pub rel: String,
}

impl EntryId {
    pub fn new<B: Into<PathBuf>, R: Into<String>>(base: B, rel: R) -> Self {
        Self {
            base: base.into(),
            rel: rel.into(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.rel.ends_with('/')
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.base.display(), self.rel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl ChangeKind {
    /// Message marker, padded so the relative paths line up in the log.
    pub fn marker(&self) -> &'static str {
        match self {
            ChangeKind::Added => "+Added   :",
            ChangeKind::Removed => "-Removed :",
            ChangeKind::Modified => "*Modified:",
        }
    }

    /// Single-character form for compact output.
    pub fn sigil(&self) -> char {
        match self {
            ChangeKind::Added => '+',
            ChangeKind::Removed => '-',
            ChangeKind::Modified => '*',
        }
    }
}

/// One observed change, stamped when the diff that produced it was taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub entry: EntryId,
    pub kind: ChangeKind,
    pub timestamp: DateTime<Local>,
}

impl ChangeEvent {
    pub fn new(entry: EntryId, kind: ChangeKind) -> Self {
        Self {
            entry,
            kind,
            timestamp: Local::now(),
        }
    }

    /// Human-readable message body: `[<base>] <marker> <relative-path>`.
    pub fn message(&self) -> String {
        format!(
            "[{}] {} {}",
            self.entry.base.display(),
            self.kind.marker(),
            self.entry.rel
        )
    }
}
