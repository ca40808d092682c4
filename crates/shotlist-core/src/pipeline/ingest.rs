//! Asset ingestion: enumerate a source, classify, enrich and order.

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;

use super::classify::classify;
use super::metadata::MetadataExtractor;
use super::thumbnail::ThumbnailSynthesizer;
use crate::config::{Config, LimitsConfig};
use crate::error::Result;
use crate::status::{messages, StatusBoard};
use crate::storage::{StorageEntry, StorageHandle};
use crate::types::{Asset, CaptureTime, FormatClass, IngestSummary, SourceRef};

/// Assets of one ingestion run, sorted by capture time.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub assets: Vec<Asset>,
    pub summary: IngestSummary,
}

/// An entry that passed classification and the size check.
struct Candidate {
    index: usize,
    entry: StorageEntry,
    class: FormatClass,
}

/// Turns the entries of a storage handle into ordered assets.
pub struct Ingestor {
    synthesizer: ThumbnailSynthesizer,
    limits: LimitsConfig,
    workers: usize,
}

impl Ingestor {
    pub fn new(config: &Config) -> Self {
        Self {
            synthesizer: ThumbnailSynthesizer::new(config.thumbnail.clone(), config.limits.clone()),
            limits: config.limits.clone(),
            workers: config.processing.parallel_workers.max(1),
        }
    }

    /// Ingest every supported image of `source`.
    ///
    /// Fails only when the source cannot be enumerated. Entries that cannot be
    /// read are skipped with a warning.
    pub async fn ingest(
        &self,
        source: &dyn StorageHandle,
        status: &StatusBoard,
    ) -> Result<IngestReport> {
        let entries = source.entries().await?;
        let total_entries = entries.len();
        status.begin(messages::reading(total_entries));
        tracing::info!("Reading {} entries from {}", total_entries, source.label());

        let candidates: Vec<Candidate> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| self.admit(index, entry))
            .collect();

        let total = candidates.len();
        let mut done = 0;
        status.progress(done, total);

        let mut loaded: Vec<(usize, Asset)> = Vec::with_capacity(total);
        let mut results = stream::iter(candidates)
            .map(|candidate| self.load(source, candidate))
            .buffer_unordered(self.workers);

        while let Some(result) = results.next().await {
            done += 1;
            status.progress(done, total);
            if let Some(item) = result {
                loaded.push(item);
            }
        }

        // Completion order is arbitrary; the enumeration index breaks ties.
        loaded.sort_by(|(ia, a), (ib, b)| {
            a.capture_time
                .at
                .cmp(&b.capture_time.at)
                .then(ia.cmp(ib))
        });
        let assets: Vec<Asset> = loaded.into_iter().map(|(_, asset)| asset).collect();

        let raw = assets.iter().filter(|a| a.is_raw()).count();
        let summary = IngestSummary {
            total_entries,
            assets: assets.len(),
            raw,
            skipped: total_entries - assets.len(),
        };

        status.finish(messages::loaded(&summary));
        tracing::info!(
            "Loaded {} images ({} RAW), skipped {}",
            summary.assets,
            summary.raw,
            summary.skipped
        );

        Ok(IngestReport { assets, summary })
    }

    fn admit(&self, index: usize, entry: StorageEntry) -> Option<Candidate> {
        if !entry.is_readable_file() {
            tracing::debug!("Skipping {}: not a readable file", entry.name);
            return None;
        }

        let class = classify(entry.content_type.as_deref(), entry.file_name());
        if !class.is_supported() {
            tracing::debug!("Skipping {}: unsupported format", entry.name);
            return None;
        }

        let max_bytes = self.limits.max_file_size_mb.saturating_mul(1024 * 1024);
        if entry.size > max_bytes {
            tracing::warn!(
                "Skipping {}: {} MB exceeds the {} MB limit",
                entry.name,
                entry.size / (1024 * 1024),
                self.limits.max_file_size_mb
            );
            return None;
        }

        Some(Candidate {
            index,
            entry,
            class,
        })
    }

    async fn load(
        &self,
        source: &dyn StorageHandle,
        candidate: Candidate,
    ) -> Option<(usize, Asset)> {
        let Candidate {
            index,
            entry,
            class,
        } = candidate;

        let bytes = match source.read(&entry.name).await {
            Ok(bytes) => Arc::new(bytes),
            Err(e) => {
                tracing::warn!("Skipping {}: {}", entry.name, e);
                return None;
            }
        };

        let file_name = entry.file_name().to_string();
        let modified = entry.modified;
        let metadata_bytes = Arc::clone(&bytes);

        let thumbnail_name = file_name.clone();
        let synthesizer = &self.synthesizer;
        let thumbnail_task = async move {
            if synthesizer.is_enabled() {
                synthesizer
                    .synthesize_async(bytes, thumbnail_name, class.is_raw())
                    .await
            } else {
                None
            }
        };

        let (capture_time, thumbnail) = tokio::join!(
            tokio::task::spawn_blocking(move || {
                MetadataExtractor::capture_time(&metadata_bytes, modified)
            }),
            thumbnail_task,
        );

        let capture_time = capture_time.unwrap_or_else(|e| {
            tracing::warn!("Metadata task for {} failed: {}", entry.name, e);
            CaptureTime::from_modified(modified.unwrap_or(DateTime::<Utc>::UNIX_EPOCH))
        });

        tracing::debug!(
            "Loaded {} ({:?}, captured {} from {:?})",
            entry.name,
            class,
            capture_time.at,
            capture_time.source
        );

        Some((
            index,
            Asset {
                source_ref: SourceRef::new(entry.name.as_str()),
                original_name: file_name,
                capture_time,
                format_class: class,
                size: entry.size,
                thumbnail,
                target_name: None,
            },
        ))
    }
}
