//! The `shotlist export` command: copy photos into the destination under
//! their dataset names.

use clap::Args;
use shotlist_core::{CancelFlag, Config, LocalDirectory, Session, ShotlistError};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use super::interactive::{self, is_interactive, theme, PromptDestination};
use super::progress::{print_summary, StatusProgress};
use super::setup::{apply_overrides, manifest, prepare_session, write_manifest, SourceArgs};

/// Arguments for the `export` command.
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Destination folder (created if missing; prompted for on a terminal)
    #[arg(long)]
    pub dest: Option<PathBuf>,

    /// Also write a JSON manifest of the run to this file
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Include base64 JPEG previews in the manifest
    #[arg(long)]
    pub thumbnails: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Execute the export command.
pub async fn execute(args: ExportArgs, mut config: Config) -> anyhow::Result<()> {
    let start = Instant::now();
    let attended = is_interactive();
    apply_overrides(&mut config, &args.source, args.thumbnails)?;

    let mut session = prepare_session(&args.source, config, attended).await?;

    if session.column().is_none() && !choose_column(&mut session, attended)? {
        theme::note("Export cancelled.");
        return Ok(());
    }
    session.check_ready()?;

    if let Some(dest) = &args.dest {
        session.set_destination(Arc::new(LocalDirectory::create_dir(dest.clone())?));
    }
    let resolver = PromptDestination::new(attended);
    match session.ensure_destination(&resolver).await {
        Ok(_) => {}
        Err(ShotlistError::SelectionDeclined(reason)) if attended => {
            tracing::debug!("Destination not chosen: {}", reason);
            theme::note("Export cancelled.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    if attended && !args.yes && args.dest.is_some() {
        let named = session
            .assets()
            .iter()
            .filter(|a| a.target_name.is_some())
            .count();
        let destination = session.destination_label().unwrap_or_default();
        if !interactive::confirm_export(named, session.assets().len(), &destination)? {
            theme::note("Export cancelled.");
            return Ok(());
        }
    }

    let cancel = CancelFlag::new();
    let interrupt = spawn_interrupt_handler(cancel.clone());

    let progress = StatusProgress::follow(session.status(), attended);
    let exported = session.export(&resolver, &cancel).await;
    progress.finish();
    interrupt.abort();
    let outcome = exported?;
    tracing::info!("{}", session.status().current().message);

    if let Some(path) = args.manifest.as_deref() {
        let listing = session.listing(args.thumbnails);
        let manifest = manifest(&session, &listing, Some(&outcome));
        write_manifest(Some(path), shotlist_core::OutputFormat::Json, &manifest)?;
    }

    print_summary(&session.summary(), Some(&outcome), start.elapsed());
    Ok(())
}

/// Make sure a column is selected, prompting when attended.
///
/// Returns `false` if the user backed out of the prompt.
fn choose_column(session: &mut Session, attended: bool) -> anyhow::Result<bool> {
    let Some(dataset) = session.dataset() else {
        return Ok(true);
    };
    let fields = dataset.fields().to_vec();
    let records = dataset.len();

    if !attended {
        anyhow::bail!(
            "No column selected. Pass --column with one of: {}",
            fields.join(", ")
        );
    }

    match interactive::select_column(&fields, records)? {
        Some(column) => {
            session.select_column(Some(&column))?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Set `cancel` on the first Ctrl-C. Items already copied stay in place.
fn spawn_interrupt_handler(cancel: CancelFlag) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current image");
            cancel.cancel();
        }
    })
}
