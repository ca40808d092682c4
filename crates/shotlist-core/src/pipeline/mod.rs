//! Pipeline stages, leaf first:
//! - **classify**: Decide whether an entry is a standard image, RAW, or neither
//! - **metadata**: Extract the capture time from EXIF
//! - **decode**: Load and decode images with dimension limits
//! - **preview**: Find JPEG previews embedded in RAW containers
//! - **placeholder**: Render the fallback card for RAW files
//! - **thumbnail**: Produce bounded-size JPEG previews
//! - **ingest**: Enumerate a source into capture-time ordered assets
//! - **projection**: Name each asset from the dataset row at its position
//! - **export**: Copy named assets into the destination

pub mod classify;
pub mod decode;
pub mod export;
pub mod ingest;
pub mod metadata;
pub mod placeholder;
pub mod preview;
pub mod projection;
pub mod thumbnail;

// Re-exports for convenient access
pub use classify::classify;
pub use decode::{DecodedImage, ImageDecoder};
pub use export::{CancelFlag, Exporter};
pub use ingest::{IngestReport, Ingestor};
pub use metadata::MetadataExtractor;
pub use placeholder::render_placeholder;
pub use preview::extract_embedded_preview;
pub use projection::{project_names, target_file_name};
pub use thumbnail::{bounded_dimensions, ThumbnailSynthesizer};
