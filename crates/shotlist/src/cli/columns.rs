//! The `shotlist columns` command: list a dataset's fields.

use anyhow::Context;
use clap::Args;
use shotlist_core::{Config, CsvLoader, DatasetLoader, TabularDataset};
use std::path::PathBuf;

use super::setup::delimiter_arg;

/// Arguments for the `columns` command.
#[derive(Args, Debug)]
pub struct ColumnsArgs {
    /// Dataset (CSV with a header row)
    #[arg(required = true)]
    pub dataset: PathBuf,

    /// Field delimiter (single character, `\t` for tab)
    #[arg(long)]
    pub delimiter: Option<String>,
}

pub async fn execute(args: ColumnsArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(delimiter) = args.delimiter.as_deref() {
        config.dataset.delimiter = delimiter_arg(delimiter);
        config.validate()?;
    }

    let bytes = tokio::fs::read(&args.dataset)
        .await
        .with_context(|| format!("Failed to read dataset {}", args.dataset.display()))?;
    let dataset = CsvLoader::new(&config.dataset).load(&bytes)?;

    print!("{}", render(&dataset));
    Ok(())
}

/// One field per line, first value as a sample, then the record count.
fn render(dataset: &TabularDataset) -> String {
    let width = dataset.fields().iter().map(String::len).max().unwrap_or(0);
    let mut out = String::new();
    for field in dataset.fields() {
        let sample = dataset.value(0, field).unwrap_or("");
        out.push_str(&format!("{:<width$}  {}\n", field, sample, width = width));
    }
    out.push_str(&format!("{} records\n", dataset.len()));
    out
}
