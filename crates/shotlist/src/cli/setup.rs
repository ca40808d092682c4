//! Shared argument handling: the source/dataset flags every pipeline command
//! takes, config overrides, and building a ready [`Session`].

use anyhow::Context;
use clap::Args;
use shotlist_core::status::messages;
use shotlist_core::{Config, CsvLoader, LocalDirectory, Manifest, OutputFormat, OutputWriter, Session};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::progress::StatusProgress;

/// Input folder and dataset flags.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Folder of photos to rename
    #[arg(required = true)]
    pub input: PathBuf,

    /// Dataset (CSV with a header row) naming the photos in capture order
    #[arg(short, long)]
    pub dataset: PathBuf,

    /// Dataset column that holds the new names
    #[arg(short, long)]
    pub column: Option<String>,

    /// Dataset field delimiter (single character, `\t` for tab)
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Number of images read concurrently
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Include photos in sub-folders
    #[arg(short, long)]
    pub recursive: bool,
}

/// Apply command-line overrides on top of the loaded config, then re-validate.
///
/// Thumbnails are only generated when `thumbnails` is set and the config
/// does not disable them.
pub fn apply_overrides(config: &mut Config, args: &SourceArgs, thumbnails: bool) -> anyhow::Result<()> {
    if let Some(parallel) = args.parallel {
        config.processing.parallel_workers = parallel;
    }
    if args.recursive {
        config.processing.recursive = true;
    }
    if let Some(delimiter) = &args.delimiter {
        config.dataset.delimiter = delimiter_arg(delimiter);
    }
    config.thumbnail.enabled &= thumbnails;
    config.validate()?;
    Ok(())
}

/// `--delimiter` value as a config delimiter; `\t` and `tab` mean a tab.
pub fn delimiter_arg(value: &str) -> String {
    match value {
        "\\t" | "tab" => "\t".to_string(),
        other => other.to_string(),
    }
}

/// Ingest the input folder, load the dataset and apply `--column`.
pub async fn prepare_session(
    args: &SourceArgs,
    config: Config,
    show_progress: bool,
) -> anyhow::Result<Session> {
    let mut session = Session::new(config);
    session.status().begin(messages::SELECTING_INPUT);

    let source = LocalDirectory::open(args.input.clone())?
        .recursive(session.config().processing.recursive);

    let progress = StatusProgress::follow(session.status(), show_progress);
    let ingested = session.ingest(Arc::new(source)).await;
    progress.finish();
    let summary = ingested?;
    tracing::info!("{}", session.status().current().message);
    if summary.assets == 0 {
        tracing::warn!("No supported images found in {}", args.input.display());
    }

    let bytes = tokio::fs::read(&args.dataset)
        .await
        .with_context(|| format!("Failed to read dataset {}", args.dataset.display()))?;
    let loader = CsvLoader::new(&session.config().dataset);
    session
        .load_dataset(&bytes, &loader)
        .with_context(|| format!("Failed to parse dataset {}", args.dataset.display()))?;

    if let Some(column) = args.column.as_deref() {
        session.select_column(Some(column))?;
    }
    Ok(session)
}

/// Write `manifest` to `path`, or to stdout when no path is given.
pub fn write_manifest(
    path: Option<&Path>,
    format: OutputFormat,
    manifest: &Manifest<'_>,
) -> anyhow::Result<()> {
    let pretty = format == OutputFormat::Json;
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = OutputWriter::new(BufWriter::new(file), format, pretty);
            writer.write_manifest(manifest)?;
            writer.flush()?;
            tracing::info!("Wrote listing to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = OutputWriter::new(stdout.lock(), format, pretty);
            writer.write_manifest(manifest)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Build a manifest for the session's current listing.
pub fn manifest<'a>(
    session: &'a Session,
    listing: &'a [shotlist_core::AssetView],
    export: Option<&'a shotlist_core::ExportOutcome>,
) -> Manifest<'a> {
    Manifest {
        version: shotlist_core::VERSION,
        source: session.source_label().unwrap_or_default(),
        column: session.column(),
        summary: session.summary(),
        export,
        assets: listing,
    }
}
