//! The pipeline state object.
//!
//! A [`Session`] owns everything one run needs: the source and destination
//! handles, the ordered assets, the dataset, the selected column and the
//! status board. Derived state (target names) is recomputed explicitly by
//! [`Session::reproject`] whenever one of its inputs changes; re-projecting
//! never re-reads the source.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::dataset::{DatasetLoader, TabularDataset};
use crate::error::{PreconditionError, Result, ShotlistError};
use crate::pipeline::{project_names, CancelFlag, Exporter, Ingestor};
use crate::status::{messages, StatusBoard};
use crate::storage::StorageHandle;
use crate::types::{Asset, AssetView, ExportOutcome, IngestSummary};

/// Supplies a destination when export starts without one.
///
/// Returning [`ShotlistError::SelectionDeclined`] aborts the export and
/// leaves the session unchanged.
#[async_trait]
pub trait DestinationResolver: Send + Sync {
    async fn resolve(&self) -> Result<Arc<dyn StorageHandle>>;
}

/// Explicit pipeline state for one run.
pub struct Session {
    config: Config,
    status: StatusBoard,
    ingestor: Ingestor,
    source: Option<Arc<dyn StorageHandle>>,
    destination: Option<Arc<dyn StorageHandle>>,
    assets: Vec<Asset>,
    summary: IngestSummary,
    dataset: Option<TabularDataset>,
    column: Option<String>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            ingestor: Ingestor::new(&config),
            config,
            status: StatusBoard::new(),
            source: None,
            destination: None,
            assets: Vec::new(),
            summary: IngestSummary::default(),
            dataset: None,
            column: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The status board. Subscribe to it to follow progress.
    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    /// Assets in capture-time order.
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Counts from the last successful ingestion.
    pub fn summary(&self) -> IngestSummary {
        self.summary
    }

    pub fn dataset(&self) -> Option<&TabularDataset> {
        self.dataset.as_ref()
    }

    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Label of the current source handle, if any.
    pub fn source_label(&self) -> Option<String> {
        self.source.as_ref().map(|s| s.label())
    }

    /// Label of the current destination handle, if any.
    pub fn destination_label(&self) -> Option<String> {
        self.destination.as_ref().map(|d| d.label())
    }

    /// Per-asset views for display, in capture-time order.
    pub fn listing(&self, with_thumbnails: bool) -> Vec<AssetView> {
        self.assets
            .iter()
            .enumerate()
            .map(|(index, asset)| AssetView::new(index, asset, with_thumbnails))
            .collect()
    }

    /// Replace the source and its assets. On failure the session is unchanged.
    pub async fn ingest(&mut self, source: Arc<dyn StorageHandle>) -> Result<IngestSummary> {
        let report = match self.ingestor.ingest(source.as_ref(), &self.status).await {
            Ok(report) => report,
            Err(e) => {
                self.status.finish(format!("Could not read {}: {}", source.label(), e));
                return Err(e);
            }
        };

        self.assets = report.assets;
        self.summary = report.summary;
        self.source = Some(source);
        self.reproject();
        Ok(self.summary)
    }

    /// Parse `bytes` with `loader` and make the result the current dataset.
    ///
    /// Returns the number of records. On failure the session is unchanged.
    pub fn load_dataset(&mut self, bytes: &[u8], loader: &dyn DatasetLoader) -> Result<usize> {
        let dataset = loader.load(bytes)?;
        let records = dataset.len();
        self.set_dataset(dataset);
        Ok(records)
    }

    /// Replace the dataset, dropping a column selection it does not have.
    pub fn set_dataset(&mut self, dataset: TabularDataset) {
        if let Some(column) = self.column.as_deref() {
            if !dataset.has_field(column) {
                tracing::info!("Column '{}' is not in the new dataset, deselecting", column);
                self.column = None;
            }
        }

        self.status.finish(messages::dataset_loaded(dataset.len()));
        tracing::info!(
            "Loaded {} records with fields {:?}",
            dataset.len(),
            dataset.fields()
        );
        self.dataset = Some(dataset);
        self.reproject();
    }

    /// Select the dataset column that names assets, or clear the selection.
    pub fn select_column(&mut self, column: Option<&str>) -> Result<()> {
        if let Some(column) = column {
            let known = self.dataset.as_ref().is_some_and(|d| d.has_field(column));
            if !known {
                let available = self
                    .dataset
                    .as_ref()
                    .map(|d| d.fields().join(", "))
                    .unwrap_or_default();
                return Err(ShotlistError::UnknownColumn {
                    column: column.to_string(),
                    available,
                });
            }
        }

        self.column = column.map(str::to_string);
        self.reproject();
        Ok(())
    }

    /// Use `destination` for the next export.
    pub fn set_destination(&mut self, destination: Arc<dyn StorageHandle>) {
        self.destination = Some(destination);
    }

    /// Recompute every asset's target name from the dataset and column.
    pub fn reproject(&mut self) {
        if let (Some(dataset), Some(column)) = (&self.dataset, &self.column) {
            let (rows, assets) = (dataset.len(), self.assets.len());
            if rows != assets && rows > 0 && assets > 0 {
                tracing::warn!(
                    "Dataset has {} records but {} images were loaded; names are matched by position",
                    rows,
                    assets
                );
            }
            tracing::debug!("Projecting column '{}' onto {} assets", column, assets);
        }
        project_names(&mut self.assets, self.dataset.as_ref(), self.column.as_deref());
    }

    /// Check that an export could start. Performs no I/O.
    pub fn check_ready(&self) -> std::result::Result<(), PreconditionError> {
        if self.source.is_none() {
            return Err(PreconditionError::NoSource);
        }
        if self.dataset.as_ref().map_or(true, TabularDataset::is_empty) {
            return Err(PreconditionError::EmptyDataset);
        }
        if self.assets.is_empty() {
            return Err(PreconditionError::NoAssets);
        }
        if self.column.is_none() {
            return Err(PreconditionError::NoColumn);
        }
        Ok(())
    }

    /// The current destination, asking `resolver` for one if none is set.
    pub async fn ensure_destination(
        &mut self,
        resolver: &dyn DestinationResolver,
    ) -> Result<Arc<dyn StorageHandle>> {
        if let Some(destination) = &self.destination {
            return Ok(Arc::clone(destination));
        }
        let destination = resolver.resolve().await?;
        self.destination = Some(Arc::clone(&destination));
        Ok(destination)
    }

    /// Copy every named asset into the destination.
    ///
    /// Fails only on unmet preconditions or a declined destination choice;
    /// per-item failures are counted in the outcome.
    pub async fn export(
        &mut self,
        resolver: &dyn DestinationResolver,
        cancel: &CancelFlag,
    ) -> Result<ExportOutcome> {
        self.check_ready()?;
        let source = match &self.source {
            Some(source) => Arc::clone(source),
            None => return Err(PreconditionError::NoSource.into()),
        };

        let destination = self.ensure_destination(resolver).await?;

        let outcome = Exporter::new()
            .run(
                &self.assets,
                source.as_ref(),
                destination.as_ref(),
                cancel,
                &self.status,
            )
            .await;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CsvLoader;
    use crate::error::StorageError;
    use crate::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        destination: MemoryStorage,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(destination: &MemoryStorage) -> Self {
            Self {
                destination: destination.clone(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DestinationResolver for Fixed {
        async fn resolve(&self) -> Result<Arc<dyn StorageHandle>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(self.destination.clone()))
        }
    }

    struct Declining;

    #[async_trait]
    impl DestinationResolver for Declining {
        async fn resolve(&self) -> Result<Arc<dyn StorageHandle>> {
            Err(ShotlistError::SelectionDeclined("no folder chosen".to_string()))
        }
    }

    fn source(names: &[&str]) -> MemoryStorage {
        let source = MemoryStorage::new("src");
        for (i, name) in names.iter().enumerate() {
            let modified = Utc.with_ymd_and_hms(2024, 3, 1, 9, i as u32, 0).unwrap();
            source.insert(*name, None, modified, name.as_bytes().to_vec());
        }
        source
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.thumbnail.enabled = false;
        config
    }

    const CSV: &str = "name,scene\nAlpha,1\nBeta,2\nGamma,3\n";

    async fn ready_session(source: &MemoryStorage) -> Session {
        let mut session = Session::new(config());
        session.ingest(Arc::new(source.clone())).await.unwrap();
        session
            .load_dataset(CSV.as_bytes(), &CsvLoader::default())
            .unwrap();
        session.select_column(Some("name")).unwrap();
        session
    }

    fn targets(session: &Session) -> Vec<Option<String>> {
        session
            .assets()
            .iter()
            .map(|a| a.target_name.clone())
            .collect()
    }

    #[tokio::test]
    async fn test_projection_follows_capture_order() {
        let src = source(&["c.cr2", "a.cr2", "b.cr2"]);
        let session = ready_session(&src).await;
        assert_eq!(
            targets(&session),
            vec![
                Some("Alpha.cr2".to_string()),
                Some("Beta.cr2".to_string()),
                Some("Gamma.cr2".to_string())
            ]
        );
        // Modification times follow insertion order here.
        assert_eq!(session.assets()[1].original_name, "a.cr2");
        assert_eq!(session.status().current().message, "Loaded 3 records from dataset");
    }

    #[tokio::test]
    async fn test_column_change_reprojects_without_reingesting() {
        let src = source(&["a.cr2", "b.cr2"]);
        let mut session = ready_session(&src).await;
        let reads = src.read_count();

        session.select_column(Some("scene")).unwrap();
        assert_eq!(
            targets(&session),
            vec![Some("1.cr2".to_string()), Some("2.cr2".to_string())]
        );
        session.select_column(None).unwrap();
        assert_eq!(targets(&session), vec![None, None]);
        assert_eq!(src.read_count(), reads);
    }

    #[tokio::test]
    async fn test_unknown_column_keeps_selection() {
        let src = source(&["a.cr2"]);
        let mut session = ready_session(&src).await;
        let err = session.select_column(Some("missing")).unwrap_err();
        assert!(matches!(err, ShotlistError::UnknownColumn { ref available, .. } if available == "name, scene"));
        assert_eq!(session.column(), Some("name"));
        assert_eq!(targets(&session), vec![Some("Alpha.cr2".to_string())]);
    }

    #[tokio::test]
    async fn test_new_dataset_without_column_deselects() {
        let src = source(&["a.cr2"]);
        let mut session = ready_session(&src).await;
        session
            .load_dataset(b"title\nX\n", &CsvLoader::default())
            .unwrap();
        assert_eq!(session.column(), None);
        assert_eq!(targets(&session), vec![None]);
    }

    #[tokio::test]
    async fn test_failed_ingest_keeps_previous_state() {
        let src = source(&["a.cr2", "b.cr2"]);
        let mut session = ready_session(&src).await;

        let broken = MemoryStorage::new("broken");
        broken.deny_listing();
        let err = session.ingest(Arc::new(broken)).await.unwrap_err();
        assert!(matches!(err, ShotlistError::Storage(StorageError::PermissionDenied { .. })));
        assert_eq!(session.assets().len(), 2);
        assert_eq!(session.source_label().as_deref(), Some("memory:src"));
    }

    #[tokio::test]
    async fn test_preconditions_are_checked_in_order_without_io() {
        let mut session = Session::new(config());
        let dest = MemoryStorage::new("dest");
        let resolver = Fixed::new(&dest);
        let cancel = CancelFlag::new();

        let err = session.export(&resolver, &cancel).await.unwrap_err();
        assert!(matches!(err, ShotlistError::Precondition(PreconditionError::NoSource)));

        let src = source(&["a.cr2"]);
        session.ingest(Arc::new(src.clone())).await.unwrap();
        let reads = src.read_count();
        assert_eq!(session.check_ready(), Err(PreconditionError::EmptyDataset));

        session
            .load_dataset(CSV.as_bytes(), &CsvLoader::default())
            .unwrap();
        assert_eq!(session.check_ready(), Err(PreconditionError::NoColumn));
        let err = session.export(&resolver, &cancel).await.unwrap_err();
        assert!(matches!(err, ShotlistError::Precondition(PreconditionError::NoColumn)));

        let empty = MemoryStorage::new("empty");
        session.ingest(Arc::new(empty)).await.unwrap();
        assert_eq!(session.check_ready(), Err(PreconditionError::NoAssets));

        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
        assert_eq!(src.read_count(), reads);
        assert!(dest.file_names().is_empty());
    }

    #[tokio::test]
    async fn test_export_resolves_destination_once() {
        let src = source(&["a.cr2", "b.cr2", "c.cr2", "d.cr2"]);
        let mut session = ready_session(&src).await;
        let dest = MemoryStorage::new("dest");
        let resolver = Fixed::new(&dest);

        let outcome = session.export(&resolver, &CancelFlag::new()).await.unwrap();
        // Four images, three records: the last image has no name.
        assert_eq!((outcome.succeeded, outcome.failed), (3, 1));
        assert_eq!(dest.file_names(), vec!["Alpha.cr2", "Beta.cr2", "Gamma.cr2"]);
        assert_eq!(dest.get("Beta.cr2").unwrap(), b"b.cr2");

        session.export(&resolver, &CancelFlag::new()).await.unwrap();
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.destination_label().as_deref(), Some("memory:dest"));
    }

    #[tokio::test]
    async fn test_declined_destination_aborts() {
        let src = source(&["a.cr2"]);
        let mut session = ready_session(&src).await;
        let reads = src.read_count();

        let err = session
            .export(&Declining, &CancelFlag::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ShotlistError::SelectionDeclined(_)));
        assert!(session.destination_label().is_none());
        assert_eq!(src.read_count(), reads);
    }

    #[tokio::test]
    async fn test_ensure_destination_before_export() {
        let src = source(&["a.cr2"]);
        let mut session = ready_session(&src).await;
        let dest = MemoryStorage::new("dest");
        let resolver = Fixed::new(&dest);

        let resolved = session.ensure_destination(&resolver).await.unwrap();
        assert_eq!(resolved.label(), "memory:dest");
        session.export(&resolver, &CancelFlag::new()).await.unwrap();
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(dest.file_names(), vec!["Alpha.cr2"]);
    }

    #[tokio::test]
    async fn test_explicit_destination_skips_resolver() {
        let src = source(&["a.cr2"]);
        let mut session = ready_session(&src).await;
        let dest = MemoryStorage::new("dest");
        session.set_destination(Arc::new(dest.clone()));

        let outcome = session
            .export(&Declining, &CancelFlag::new())
            .await
            .unwrap();
        assert_eq!(outcome.succeeded, 1);
        assert_eq!(dest.file_names(), vec!["Alpha.cr2"]);
    }

    #[tokio::test]
    async fn test_listing_reflects_targets() {
        let src = source(&["a.cr2", "b.cr2"]);
        let session = ready_session(&src).await;
        let listing = session.listing(false);
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[1].index, 1);
        assert_eq!(listing[1].target_name.as_deref(), Some("Beta.cr2"));
        assert!(listing[0].raw);
    }
}
