//! Batch export: copy each named asset into the destination under its target
//! name.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{PipelineError, PipelineResult};
use crate::status::{messages, StatusBoard};
use crate::storage::StorageHandle;
use crate::types::{Asset, ExportOutcome};

/// Cooperative cancellation for a running export. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that no further items are attempted.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Copies assets from a source handle to a destination handle.
#[derive(Debug, Default)]
pub struct Exporter;

impl Exporter {
    pub fn new() -> Self {
        Self
    }

    /// Export `assets` in order. Never fails as a whole.
    ///
    /// Each item either succeeds or is counted as failed with its cause
    /// logged; the batch always continues. The flag is checked before each
    /// item. Files written before cancellation are kept.
    pub async fn run(
        &self,
        assets: &[Asset],
        source: &dyn StorageHandle,
        destination: &dyn StorageHandle,
        cancel: &CancelFlag,
        status: &StatusBoard,
    ) -> ExportOutcome {
        let total = assets.len();
        let mut outcome = ExportOutcome::default();
        let mut written: HashSet<&str> = HashSet::new();

        status.begin(messages::STARTING_EXPORT);
        status.progress(0, total);
        tracing::info!(
            "Exporting {} images from {} to {}",
            total,
            source.label(),
            destination.label()
        );

        for asset in assets {
            if cancel.is_cancelled() {
                tracing::warn!(
                    "Export cancelled after {} of {} items",
                    outcome.attempted(),
                    total
                );
                outcome.cancelled = true;
                break;
            }

            outcome.last_attempted = Some(asset.original_name.clone());
            match self.export_one(asset, source, destination, &written).await {
                Ok(target) => {
                    tracing::debug!("Copied {} -> {}", asset.original_name, target);
                    written.insert(target);
                    outcome.succeeded += 1;
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    outcome.failed += 1;
                }
            }
            status.progress(outcome.attempted(), total);
        }

        let summary = messages::copied(&outcome);
        tracing::info!("{}", summary);
        status.finish(summary);
        outcome
    }

    async fn export_one<'a>(
        &self,
        asset: &'a Asset,
        source: &dyn StorageHandle,
        destination: &dyn StorageHandle,
        written: &HashSet<&str>,
    ) -> PipelineResult<&'a str> {
        let name = &asset.original_name;
        let target = asset
            .target_name
            .as_deref()
            .ok_or_else(|| PipelineError::MissingTarget { name: name.clone() })?;

        if written.contains(target) {
            return Err(PipelineError::DuplicateTarget {
                name: name.clone(),
                target: target.to_string(),
            });
        }

        let storage_err = |err| PipelineError::Storage {
            name: name.clone(),
            source: err,
        };

        // Read first so an unreadable source leaves no empty file behind.
        let bytes = source
            .read(asset.source_ref.as_str())
            .await
            .map_err(storage_err)?;
        let mut writer = destination.create(target).await.map_err(storage_err)?;
        writer.write_all(&bytes).await.map_err(storage_err)?;
        writer.finalize().await.map_err(storage_err)?;

        Ok(target)
    }
}
