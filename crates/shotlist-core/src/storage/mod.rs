//! Storage handles: directory-like capabilities the pipeline reads from and
//! writes to.
//!
//! Handles are injected into the session rather than looked up globally, so
//! tests can substitute [`memory::MemoryStorage`] for a real directory.
//!
//! - **local**: a directory on disk
//! - **memory**: an in-memory store with failure injection

pub mod local;
pub mod memory;

pub use local::LocalDirectory;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StorageError;

/// Kind of an enumerated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One enumerated entry of a storage handle.
#[derive(Debug, Clone)]
pub struct StorageEntry {
    /// Name relative to the handle, usable with [`StorageHandle::read`]
    pub name: String,
    pub kind: EntryKind,
    pub readable: bool,
    /// Declared content type, when the storage layer knows one
    pub content_type: Option<String>,
    /// Last-modified time, when the storage layer knows one
    pub modified: Option<DateTime<Utc>>,
    pub size: u64,
}

impl StorageEntry {
    /// Whether the entry is a file the pipeline can read.
    pub fn is_readable_file(&self) -> bool {
        self.kind == EntryKind::File && self.readable
    }

    /// The base file name (last path component of `name`).
    pub fn file_name(&self) -> &str {
        self.name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.name.as_str())
    }
}

/// A directory-like capability.
#[async_trait]
pub trait StorageHandle: Send + Sync {
    /// Human-readable location, for logs and status messages.
    fn label(&self) -> String;

    /// Enumerate entries.
    async fn entries(&self) -> Result<Vec<StorageEntry>, StorageError>;

    /// Read the full contents of a named entry.
    async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError>;

    /// Create a named entry for writing, truncating any existing one.
    async fn create(&self, name: &str) -> Result<Box<dyn EntryWriter>, StorageError>;
}

/// An open, not yet finalized write to a storage entry.
#[async_trait]
pub trait EntryWriter: Send {
    /// Append bytes to the entry.
    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), StorageError>;

    /// Flush and close the entry.
    async fn finalize(self: Box<Self>) -> Result<(), StorageError>;
}

/// Check a name is a single path component that can be created in a handle.
pub(crate) fn validate_entry_name(name: &str) -> Result<(), StorageError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StorageError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, kind: EntryKind, readable: bool) -> StorageEntry {
        StorageEntry {
            name: name.to_string(),
            kind,
            readable,
            content_type: None,
            modified: None,
            size: 0,
        }
    }

    #[test]
    fn test_is_readable_file() {
        assert!(entry("a.jpg", EntryKind::File, true).is_readable_file());
        assert!(!entry("a.jpg", EntryKind::File, false).is_readable_file());
        assert!(!entry("day1", EntryKind::Directory, true).is_readable_file());
    }

    #[test]
    fn test_file_name_strips_directories() {
        assert_eq!(entry("day1/a.jpg", EntryKind::File, true).file_name(), "a.jpg");
        assert_eq!(entry("a.jpg", EntryKind::File, true).file_name(), "a.jpg");
    }

    #[test]
    fn test_validate_entry_name() {
        assert!(validate_entry_name("Alpha.jpg").is_ok());
        assert!(validate_entry_name("Shot 12 - take 2.cr2").is_ok());
        assert!(validate_entry_name("").is_err());
        assert!(validate_entry_name("..").is_err());
        assert!(validate_entry_name("../escape.jpg").is_err());
        assert!(validate_entry_name("a/b.jpg").is_err());
        assert!(validate_entry_name("a\\b.jpg").is_err());
    }
}
