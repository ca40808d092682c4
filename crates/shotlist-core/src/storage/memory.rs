//! In-memory storage handle with failure injection.
//!
//! Entries keep insertion order, so enumeration order is deterministic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{validate_entry_name, EntryKind, EntryWriter, StorageEntry, StorageHandle};
use crate::error::StorageError;

#[derive(Debug, Clone)]
struct MemoryEntry {
    name: String,
    bytes: Vec<u8>,
    content_type: Option<String>,
    modified: DateTime<Utc>,
    kind: EntryKind,
}

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<MemoryEntry>,
    deny_listing: bool,
    failing_reads: HashSet<String>,
    failing_writes: HashSet<String>,
    reads: usize,
}

/// An in-memory storage handle. Clones share the same contents.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    label: String,
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock only means a test panicked mid-write; the data is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add (or replace) a file entry.
    pub fn insert(
        &self,
        name: impl Into<String>,
        content_type: Option<&str>,
        modified: DateTime<Utc>,
        bytes: impl Into<Vec<u8>>,
    ) {
        let entry = MemoryEntry {
            name: name.into(),
            bytes: bytes.into(),
            content_type: content_type.map(str::to_string),
            modified,
            kind: EntryKind::File,
        };
        self.upsert(entry);
    }

    /// Add a directory entry.
    pub fn insert_dir(&self, name: impl Into<String>, modified: DateTime<Utc>) {
        self.upsert(MemoryEntry {
            name: name.into(),
            bytes: Vec::new(),
            content_type: None,
            modified,
            kind: EntryKind::Directory,
        });
    }

    fn upsert(&self, entry: MemoryEntry) {
        let mut inner = self.lock();
        match inner.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => inner.entries.push(entry),
        }
    }

    /// Make enumeration fail with a permission error.
    pub fn deny_listing(&self) {
        self.lock().deny_listing = true;
    }

    /// Make reads of `name` fail.
    pub fn fail_reads_for(&self, name: impl Into<String>) {
        self.lock().failing_reads.insert(name.into());
    }

    /// Make writes to `name` fail.
    pub fn fail_writes_for(&self, name: impl Into<String>) {
        self.lock().failing_writes.insert(name.into());
    }

    /// Contents of a file entry.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.lock()
            .entries
            .iter()
            .find(|e| e.name == name && e.kind == EntryKind::File)
            .map(|e| e.bytes.clone())
    }

    /// Names of all file entries, in insertion order.
    pub fn file_names(&self) -> Vec<String> {
        self.lock()
            .entries
            .iter()
            .filter(|e| e.kind == EntryKind::File)
            .map(|e| e.name.clone())
            .collect()
    }

    /// Number of successful and failed `read` calls so far.
    pub fn read_count(&self) -> usize {
        self.lock().reads
    }
}

#[async_trait]
impl StorageHandle for MemoryStorage {
    fn label(&self) -> String {
        format!("memory:{}", self.label)
    }

    async fn entries(&self) -> Result<Vec<StorageEntry>, StorageError> {
        let inner = self.lock();
        if inner.deny_listing {
            return Err(StorageError::PermissionDenied {
                path: PathBuf::from(&self.label),
            });
        }
        Ok(inner
            .entries
            .iter()
            .map(|e| StorageEntry {
                name: e.name.clone(),
                kind: e.kind,
                readable: true,
                content_type: e.content_type.clone(),
                modified: Some(e.modified),
                size: e.bytes.len() as u64,
            })
            .collect())
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let mut inner = self.lock();
        inner.reads += 1;
        if inner.failing_reads.contains(name) {
            return Err(StorageError::Io {
                name: name.to_string(),
                source: std::io::Error::other("injected read failure"),
            });
        }
        inner
            .entries
            .iter()
            .find(|e| e.name == name && e.kind == EntryKind::File)
            .map(|e| e.bytes.clone())
            .ok_or_else(|| StorageError::NotFound {
                name: name.to_string(),
            })
    }

    async fn create(&self, name: &str) -> Result<Box<dyn EntryWriter>, StorageError> {
        validate_entry_name(name)?;
        Ok(Box::new(MemoryWriter {
            storage: self.clone(),
            name: name.to_string(),
            buffer: Vec::new(),
        }))
    }
}

struct MemoryWriter {
    storage: MemoryStorage,
    name: String,
    buffer: Vec<u8>,
}

#[async_trait]
impl EntryWriter for MemoryWriter {
    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        if self.storage.lock().failing_writes.contains(&self.name) {
            return Err(StorageError::Io {
                name: self.name.clone(),
                source: std::io::Error::other("injected write failure"),
            });
        }
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    async fn finalize(self: Box<Self>) -> Result<(), StorageError> {
        let MemoryWriter {
            storage,
            name,
            buffer,
        } = *self;
        storage.insert(name, None, Utc::now(), buffer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entries_keep_insertion_order() {
        let storage = MemoryStorage::new("src");
        storage.insert("b.jpg", Some("image/jpeg"), Utc::now(), b"b".to_vec());
        storage.insert("a.jpg", Some("image/jpeg"), Utc::now(), b"a".to_vec());
        storage.insert_dir("sub", Utc::now());

        let names: Vec<String> = storage
            .entries()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["b.jpg", "a.jpg", "sub"]);
        assert_eq!(storage.file_names(), vec!["b.jpg", "a.jpg"]);
    }

    #[tokio::test]
    async fn test_denied_listing() {
        let storage = MemoryStorage::new("src");
        storage.deny_listing();
        let err = storage.entries().await.unwrap_err();
        assert!(matches!(err, StorageError::PermissionDenied { .. }));
    }

    #[tokio::test]
    async fn test_write_only_visible_after_finalize() {
        let storage = MemoryStorage::new("dest");
        let mut writer = storage.create("Alpha.jpg").await.unwrap();
        writer.write_all(b"abc").await.unwrap();
        assert!(storage.get("Alpha.jpg").is_none());
        writer.finalize().await.unwrap();
        assert_eq!(storage.get("Alpha.jpg").unwrap(), b"abc");
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let storage = MemoryStorage::new("src");
        storage.insert("a.jpg", None, Utc::now(), b"a".to_vec());
        storage.fail_reads_for("a.jpg");
        storage.fail_writes_for("out.jpg");

        assert!(storage.read("a.jpg").await.is_err());
        assert_eq!(storage.read_count(), 1);

        let mut writer = storage.create("out.jpg").await.unwrap();
        assert!(writer.write_all(b"x").await.is_err());
    }
}
