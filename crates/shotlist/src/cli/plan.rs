//! The `shotlist plan` command: show what an export would do.

use clap::Args;
use shotlist_core::Config;
use std::path::PathBuf;
use std::time::Instant;

use super::interactive::is_interactive;
use super::progress::print_summary;
use super::setup::{apply_overrides, manifest, prepare_session, write_manifest, SourceArgs};
use super::types::OutputFormat;

/// Arguments for the `plan` command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Include base64 JPEG previews in the listing
    #[arg(long)]
    pub with_thumbnails: bool,
}

/// Execute the plan command. Never prompts and never writes to the source.
pub async fn execute(args: PlanArgs, mut config: Config) -> anyhow::Result<()> {
    let start = Instant::now();
    apply_overrides(&mut config, &args.source, args.with_thumbnails)?;

    let session = prepare_session(&args.source, config, is_interactive()).await?;
    if session.column().is_none() {
        tracing::warn!("No --column given, target names are empty (see `shotlist columns`)");
    }

    let listing = session.listing(args.with_thumbnails);
    let manifest = manifest(&session, &listing, None);
    write_manifest(args.output.as_deref(), args.format.into(), &manifest)?;

    print_summary(&session.summary(), None, start.elapsed());
    Ok(())
}
