//! Core data types for the shotlist pipeline.
//!
//! An [`Asset`] is one classified, metadata-enriched source image. Assets are
//! created by ingestion, receive a thumbnail during ingestion and a target name
//! from name projection, and are only ever replaced as a whole collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Opaque reference to an entry inside the source storage handle.
///
/// Enough to re-read the original bytes later; the bytes themselves are not
/// kept in memory between ingestion and export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(String);

impl SourceRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Format class decided by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatClass {
    Standard,
    Raw,
    Unsupported,
}

impl FormatClass {
    /// Whether the entry becomes an asset at all.
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    /// Whether the entry is a camera RAW container.
    pub fn is_raw(self) -> bool {
        matches!(self, Self::Raw)
    }
}

/// Where a capture timestamp came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureSource {
    /// EXIF DateTimeOriginal
    ExifOriginal,
    /// EXIF DateTimeDigitized
    ExifDigitized,
    /// Storage-level last-modified time
    Modified,
}

/// Best-available timestamp for when a photo was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureTime {
    pub at: DateTime<Utc>,
    pub source: CaptureSource,
}

impl CaptureTime {
    /// Capture time taken from the storage entry's modification time.
    pub fn from_modified(modified: DateTime<Utc>) -> Self {
        Self {
            at: modified,
            source: CaptureSource::Modified,
        }
    }
}

/// How a preview was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewSource {
    /// Decoded from the full image
    Decoded,
    /// Extracted from a preview embedded in a RAW container
    Embedded,
    /// Synthesized placeholder
    Placeholder,
}

/// A bounded-size JPEG preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    /// Base64-encoded JPEG bytes
    pub data: String,
    pub width: u32,
    pub height: u32,
    pub source: PreviewSource,
}

impl Preview {
    /// Return a data URL suitable for embedding in HTML.
    pub fn data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", self.data)
    }
}

/// One source image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Entry name inside the source handle
    pub source_ref: SourceRef,

    /// File name including extension
    pub original_name: String,

    /// Sort key
    pub capture_time: CaptureTime,

    pub format_class: FormatClass,

    /// Entry size in bytes, as reported at enumeration
    pub size: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Preview>,

    /// Set by name projection. Same extension as `original_name`, lower-cased.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
}

impl Asset {
    pub fn is_raw(&self) -> bool {
        self.format_class.is_raw()
    }
}

/// Lower-cased extension of a file name, if it has a non-empty one.
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_lowercase())
}

/// Counts reported after an ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Entries enumerated in the source
    pub total_entries: usize,

    /// Entries that became assets
    pub assets: usize,

    /// Assets classified as RAW
    pub raw: usize,

    /// Entries that did not become assets
    pub skipped: usize,
}

impl IngestSummary {
    pub fn has_raw(&self) -> bool {
        self.raw > 0
    }
}

/// Aggregate result of an export run. Used for status reporting only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOutcome {
    pub succeeded: usize,
    pub failed: usize,

    /// Original name of the last asset an attempt was made for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_attempted: Option<String>,

    /// The run stopped early because cancellation was requested
    pub cancelled: bool,
}

impl ExportOutcome {
    /// Number of items an attempt was made for.
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Per-asset view for listings and display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetView {
    /// Position in capture-time order
    pub index: usize,
    pub original_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
    pub capture_time: DateTime<Utc>,
    pub capture_source: CaptureSource,
    pub raw: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl AssetView {
    /// Build a view of `asset` at sorted position `index`.
    pub fn new(index: usize, asset: &Asset, with_thumbnail: bool) -> Self {
        Self {
            index,
            original_name: asset.original_name.clone(),
            target_name: asset.target_name.clone(),
            capture_time: asset.capture_time.at,
            capture_source: asset.capture_time.source,
            raw: asset.is_raw(),
            thumbnail: if with_thumbnail {
                asset.thumbnail.as_ref().map(Preview::data_url)
            } else {
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_asset() -> Asset {
        Asset {
            source_ref: SourceRef::new("IMG_0007.JPG"),
            original_name: "IMG_0007.JPG".to_string(),
            capture_time: CaptureTime::from_modified(
                Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            ),
            format_class: FormatClass::Standard,
            size: 2048,
            thumbnail: None,
            target_name: Some("Alpha.jpg".to_string()),
        }
    }

    #[test]
    fn test_format_class_flags() {
        assert!(FormatClass::Standard.is_supported());
        assert!(!FormatClass::Standard.is_raw());
        assert!(FormatClass::Raw.is_supported());
        assert!(FormatClass::Raw.is_raw());
        assert!(!FormatClass::Unsupported.is_supported());
        assert!(!FormatClass::Unsupported.is_raw());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("IMG_0007.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_of("archive.tar.GZ").as_deref(), Some("gz"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of(".hidden"), None);
    }

    #[test]
    fn test_asset_view_omits_thumbnail_by_default() {
        let mut asset = sample_asset();
        asset.thumbnail = Some(Preview {
            data: "AAAA".to_string(),
            width: 4,
            height: 3,
            source: PreviewSource::Decoded,
        });

        let view = AssetView::new(0, &asset, false);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("thumbnail"));
        assert!(json.contains("\"target_name\":\"Alpha.jpg\""));

        let view = AssetView::new(0, &asset, true);
        assert_eq!(
            view.thumbnail.as_deref(),
            Some("data:image/jpeg;base64,AAAA")
        );
    }

    #[test]
    fn test_export_outcome_serializes_counts() {
        let outcome = ExportOutcome {
            succeeded: 4,
            failed: 1,
            last_attempted: Some("e.jpg".to_string()),
            cancelled: false,
        };
        assert_eq!(outcome.attempted(), 5);
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"succeeded\":4"));
        assert!(json.contains("\"failed\":1"));
    }

    #[test]
    fn test_ingest_summary_has_raw() {
        let mut summary = IngestSummary::default();
        assert!(!summary.has_raw());
        summary.raw = 2;
        assert!(summary.has_raw());
    }
}
