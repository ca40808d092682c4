//! Observable pipeline status.
//!
//! A [`StatusBoard`] holds the latest [`StatusSnapshot`]. Pipeline stages
//! publish phase messages and progress; front ends subscribe and render
//! whatever the most recent value is.

use serde::Serialize;
use tokio::sync::watch;

/// The latest published status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    /// Human-readable phase message
    pub message: String,

    /// A long-running stage is in progress
    pub processing: bool,

    /// `(done, total)` for the running stage, if it reports progress
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<(usize, usize)>,
}

/// Shared publisher of [`StatusSnapshot`]s. Clones publish to the same board.
#[derive(Debug, Clone)]
pub struct StatusBoard {
    tx: watch::Sender<StatusSnapshot>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(StatusSnapshot::default());
        Self { tx }
    }

    /// Receive every future update.
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.tx.subscribe()
    }

    /// The current snapshot.
    pub fn current(&self) -> StatusSnapshot {
        self.tx.borrow().clone()
    }

    /// Start a long-running phase.
    pub fn begin(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("Status: {}", message);
        self.tx.send_replace(StatusSnapshot {
            message,
            processing: true,
            progress: None,
        });
    }

    /// Report progress within the current phase.
    pub fn progress(&self, done: usize, total: usize) {
        self.tx.send_modify(|s| s.progress = Some((done, total)));
    }

    /// End the current phase with a final message.
    pub fn finish(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("Status: {}", message);
        self.tx.send_modify(|s| {
            s.message = message;
            s.processing = false;
        });
    }
}

/// Phase messages shown to the user.
pub mod messages {
    use crate::types::{ExportOutcome, IngestSummary};

    pub const SELECTING_INPUT: &str = "Selecting input folder...";
    pub const STARTING_EXPORT: &str = "Starting export...";

    pub fn reading(entries: usize) -> String {
        format!("Reading {} entries...", entries)
    }

    pub fn loaded(summary: &IngestSummary) -> String {
        format!(
            "Loaded {} images ({} RAW), sorted by capture time",
            summary.assets, summary.raw
        )
    }

    pub fn dataset_loaded(records: usize) -> String {
        format!("Loaded {} records from dataset", records)
    }

    pub fn copied(outcome: &ExportOutcome) -> String {
        format!(
            "Copied {} images, {} errors",
            outcome.succeeded, outcome.failed
        )
    }
}
