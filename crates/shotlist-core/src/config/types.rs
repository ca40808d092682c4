//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Source enumeration and ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of assets ingested concurrently
    pub parallel_workers: usize,

    /// Descend into sub-folders of the source folder
    pub recursive: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 4,
            recursive: false,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Entries larger than this are skipped at ingestion
    pub max_file_size_mb: u64,

    /// Maximum decoded image dimension (width or height)
    pub max_image_dimension: u32,

    /// Thumbnail decode/encode timeout in milliseconds
    pub decode_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 200,
            max_image_dimension: 20000,
            decode_timeout_ms: 10000,
        }
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Whether to generate thumbnails
    pub enabled: bool,

    /// Longest edge of a preview in pixels
    pub size: u32,

    /// JPEG quality factor (1-100)
    pub quality: u8,

    /// Width of the RAW placeholder image
    pub placeholder_width: u32,

    /// Height of the RAW placeholder image
    pub placeholder_height: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 400,
            quality: 80,
            placeholder_width: 400,
            placeholder_height: 300,
        }
    }
}

/// Tabular dataset parsing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Field delimiter (a single ASCII character)
    pub delimiter: String,

    /// Trim surrounding whitespace from headers and cells
    pub trim: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            trim: true,
        }
    }
}

impl DatasetConfig {
    /// The delimiter as a byte, if it is a single ASCII character.
    pub fn delimiter_byte(&self) -> Option<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Some(*b),
            _ => None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
