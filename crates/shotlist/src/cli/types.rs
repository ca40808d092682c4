//! CLI enum types shared by the listing commands.

use clap::ValueEnum;
use shotlist_core::OutputFormat as CoreOutputFormat;

/// Supported listing formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// A single JSON document with run context
    Json,
    /// One JSON object per image
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}
