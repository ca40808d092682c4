//! Storage handle backed by a directory on the local filesystem.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;
use walkdir::WalkDir;

use super::{validate_entry_name, EntryKind, EntryWriter, StorageEntry, StorageHandle};
use crate::error::StorageError;

/// A directory on disk.
#[derive(Debug, Clone)]
pub struct LocalDirectory {
    root: PathBuf,
    recursive: bool,
}

impl LocalDirectory {
    /// Open an existing directory.
    ///
    /// Fails if the path does not exist, is not a directory, or cannot be
    /// listed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        let label = root.display().to_string();
        let meta = std::fs::metadata(&root).map_err(|e| StorageError::from_io(&label, &root, e))?;
        if !meta.is_dir() {
            return Err(StorageError::Unsupported(format!(
                "{label} is not a directory"
            )));
        }
        std::fs::read_dir(&root).map_err(|e| StorageError::from_io(&label, &root, e))?;
        Ok(Self {
            root,
            recursive: false,
        })
    }

    /// Open a directory, creating it (and its parents) if missing.
    pub fn create_dir(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .map_err(|e| StorageError::from_io(root.display().to_string(), &root, e))?;
        Self::open(root)
    }

    /// Also enumerate entries of sub-directories.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an entry name to a path below the root.
    fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if name.is_empty() || escapes {
            return Err(StorageError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }

    fn enumerate(root: &Path, recursive: bool) -> Result<Vec<StorageEntry>, StorageError> {
        let label = root.display().to_string();
        std::fs::read_dir(root).map_err(|e| StorageError::from_io(&label, root, e))?;

        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut entries = Vec::new();

        for item in WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", label, e);
                    continue;
                }
            };

            let Ok(relative) = item.path().strip_prefix(root) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            let kind = if item.file_type().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };

            let (readable, modified, size) = match item.metadata() {
                Ok(meta) => (
                    true,
                    meta.modified().ok().map(DateTime::<Utc>::from),
                    meta.len(),
                ),
                Err(e) => {
                    tracing::debug!("No metadata for {}: {}", name, e);
                    (false, None, 0)
                }
            };

            let content_type = match kind {
                EntryKind::File => mime_guess::from_path(item.path())
                    .first()
                    .map(|m| m.essence_str().to_string()),
                EntryKind::Directory => None,
            };

            entries.push(StorageEntry {
                name,
                kind,
                readable,
                content_type,
                modified,
                size,
            });
        }

        Ok(entries)
    }
}

#[async_trait]
impl StorageHandle for LocalDirectory {
    fn label(&self) -> String {
        self.root.display().to_string()
    }

    async fn entries(&self) -> Result<Vec<StorageEntry>, StorageError> {
        let root = self.root.clone();
        let recursive = self.recursive;
        tokio::task::spawn_blocking(move || Self::enumerate(&root, recursive))
            .await
            .map_err(|e| StorageError::Io {
                name: self.label(),
                source: std::io::Error::other(e),
            })?
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(name)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| StorageError::from_io(name, &path, e))
    }

    async fn create(&self, name: &str) -> Result<Box<dyn EntryWriter>, StorageError> {
        validate_entry_name(name)?;
        let path = self.root.join(name);
        let file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| StorageError::from_io(name, &path, e))?;
        Ok(Box::new(LocalWriter {
            file,
            name: name.to_string(),
            path,
        }))
    }
}

struct LocalWriter {
    file: tokio::fs::File,
    name: String,
    path: PathBuf,
}

#[async_trait]
impl EntryWriter for LocalWriter {
    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        self.file
            .write_all(bytes)
            .await
            .map_err(|e| StorageError::from_io(&self.name, &self.path, e))
    }

    async fn finalize(mut self: Box<Self>) -> Result<(), StorageError> {
        self.file
            .flush()
            .await
            .map_err(|e| StorageError::from_io(&self.name, &self.path, e))?;
        self.file
            .sync_all()
            .await
            .map_err(|e| StorageError::from_io(&self.name, &self.path, e))
    }
}
