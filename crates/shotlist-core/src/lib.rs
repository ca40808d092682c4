//! Shotlist Core - capture-ordered photo renaming from a tabular dataset.
//!
//! Shotlist reads a folder of photos (standard formats and camera RAW), orders
//! them by capture time, names each one from the dataset row at the same
//! position, and copies them to a destination under those names.
//!
//! # Architecture
//!
//! ```text
//! Source → Classify → (Capture time ‖ Thumbnail) → Sort → Project names → Export
//! ```
//!
//! Ingestion runs once per source. Changing the dataset or the column only
//! re-runs name projection.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shotlist_core::{CancelFlag, Config, CsvLoader, LocalDirectory, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     let loader = CsvLoader::new(&config.dataset);
//!     let mut session = Session::new(config);
//!
//!     session.ingest(Arc::new(LocalDirectory::open("./shoot")?)).await?;
//!     session.load_dataset(&std::fs::read("./names.csv")?, &loader)?;
//!     session.select_column(Some("name"))?;
//!     session.set_destination(Arc::new(LocalDirectory::create_dir("./renamed")?));
//!
//!     // `resolver` is only asked when no destination has been set.
//!     let outcome = session.export(&resolver, &CancelFlag::new()).await?;
//!     println!("{} copied, {} failed", outcome.succeeded, outcome.failed);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod dataset;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod session;
pub mod status;
pub mod storage;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use dataset::{CsvLoader, DatasetLoader, TabularDataset};
pub use error::{
    ConfigError, DatasetError, PipelineError, PipelineResult, PreconditionError, Result,
    ShotlistError, StorageError,
};
pub use output::{Manifest, OutputFormat, OutputWriter};
pub use pipeline::{CancelFlag, IngestReport};
pub use session::{DestinationResolver, Session};
pub use status::{StatusBoard, StatusSnapshot};
pub use storage::{LocalDirectory, MemoryStorage, StorageHandle};
pub use types::{Asset, AssetView, ExportOutcome, IngestSummary};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
