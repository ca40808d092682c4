//! Error types for the shotlist pipeline.
//!
//! Only environment, permission, selection and precondition failures reach the
//! caller as `ShotlistError`. Per-asset and per-item problems are expressed as
//! `PipelineError` values that are logged and folded into counters or fallback
//! values, never propagated.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for shotlist operations.
#[derive(Error, Debug)]
pub enum ShotlistError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A storage handle could not be opened or enumerated
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The tabular dataset could not be loaded
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Export was requested before the session was ready
    #[error("Cannot export: {0}")]
    Precondition(#[from] PreconditionError),

    /// The user declined or failed to pick a folder or file
    #[error("Selection declined: {0}")]
    SelectionDeclined(String),

    /// A column was selected that the dataset does not have
    #[error("Unknown column '{column}' (available: {available})")]
    UnknownColumn { column: String, available: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised by storage handles.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The required storage capability is not available here
    #[error("Storage not supported: {0}")]
    Unsupported(String),

    /// Access to the location was refused
    #[error("Permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// The location or entry does not exist
    #[error("Not found: {name}")]
    NotFound { name: String },

    /// The entry name cannot be used inside this handle
    #[error("Invalid entry name: {name:?}")]
    InvalidName { name: String },

    /// Any other I/O failure, with the entry it happened on
    #[error("IO error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Map an I/O error on `name` to the closest storage error.
    pub fn from_io(name: impl Into<String>, path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let name = name.into();
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path: path.into() },
            std::io::ErrorKind::NotFound => Self::NotFound { name },
            _ => Self::Io { name, source: err },
        }
    }
}

/// Errors raised while loading a tabular dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The bytes are not valid delimited text
    #[error("Failed to parse dataset: {0}")]
    Parse(#[from] csv::Error),

    /// The first row does not name any field
    #[error("Dataset has no header row")]
    MissingHeader,

    /// A header field is empty or repeated
    #[error("Invalid header field {0:?}")]
    InvalidHeader(String),
}

/// Reasons an export cannot start. Raised before any I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("no source folder has been loaded")]
    NoSource,

    #[error("the dataset is empty or has not been loaded")]
    EmptyDataset,

    #[error("no images were found in the source folder")]
    NoAssets,

    #[error("no dataset column has been selected")]
    NoColumn,
}

/// Per-asset and per-item failures. Logged, counted, never propagated.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image decoding failed
    #[error("Decode error for {name}: {message}")]
    Decode { name: String, message: String },

    /// Image dimensions exceed limit
    #[error("Image too large: {name} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        name: String,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Operation timed out
    #[error("Timeout in {stage} stage for {name} after {timeout_ms}ms")]
    Timeout {
        name: String,
        stage: String,
        timeout_ms: u64,
    },

    /// The asset has no target name to export under
    #[error("No target name for {name}")]
    MissingTarget { name: String },

    /// Another asset in this batch was already written under the same name
    #[error("Target name {target} for {name} was already used in this export")]
    DuplicateTarget { name: String, target: String },

    /// Reading the source or writing the destination failed
    #[error("Copy failed for {name}: {source}")]
    Storage {
        name: String,
        #[source]
        source: StorageError,
    },
}

/// Convenience type alias for shotlist results.
pub type Result<T> = std::result::Result<T, ShotlistError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
