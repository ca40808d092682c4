//! Listing output: the per-asset plan as JSON or JSON Lines.
//!
//! A listing is the ordered [`AssetView`]s of a session. JSON output wraps it
//! in a [`Manifest`] with the run context; JSON Lines writes one view per line
//! so it can be streamed into other tools.

use serde::Serialize;
use std::io::{self, Write};

use crate::types::{AssetView, ExportOutcome, IngestSummary};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// A single manifest object
    Json,
    /// One asset view per line
    JsonLines,
}

/// Run context plus the listing, for JSON output and `--manifest` files.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest<'a> {
    pub version: &'static str,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<&'a str>,
    pub summary: IngestSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<&'a ExportOutcome>,
    pub assets: &'a [AssetView],
}

/// Serializes listings to an underlying writer.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects JSON output.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write a manifest: the whole object for JSON, its asset views for JSONL.
    pub fn write_manifest(&mut self, manifest: &Manifest<'_>) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.write_json(manifest),
            OutputFormat::JsonLines => self.write_lines(manifest.assets),
        }
    }

    fn write_json<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, value).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }

    fn write_lines(&mut self, views: &[AssetView]) -> io::Result<()> {
        for view in views {
            serde_json::to_writer(&mut self.writer, view).map_err(io::Error::other)?;
            writeln!(self.writer)?;
        }
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
