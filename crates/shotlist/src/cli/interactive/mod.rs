//! Interactive prompts for choices the command line left open.
//!
//! Prompts only run when stderr is attended by a user; scripted runs get an
//! error telling them which flag to pass instead.

pub mod theme;

use async_trait::async_trait;
use dialoguer::{Confirm, Input, Select};
use shotlist_core::config::expand_path;
use shotlist_core::{DestinationResolver, LocalDirectory, ShotlistError, StorageHandle};
use std::path::PathBuf;
use std::sync::Arc;

use theme::shotlist_theme;

/// Whether a person is at the terminal to answer prompts.
pub fn is_interactive() -> bool {
    console::user_attended_stderr()
}

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Ask which dataset field names the images. `None` if the user backs out.
pub fn select_column(fields: &[String], records: usize) -> anyhow::Result<Option<String>> {
    theme::note(format!("Dataset has {} records", records));
    let selection = Select::with_theme(&shotlist_theme())
        .with_prompt("Which column names the images?")
        .items(fields)
        .default(0)
        .interact_opt()?;
    Ok(selection.map(|i| fields[i].clone()))
}

/// Ask for a destination folder path, re-prompting on empty input.
pub fn prompt_destination() -> anyhow::Result<Option<PathBuf>> {
    let theme = shotlist_theme();
    loop {
        let Some(raw) = handle_interrupt(
            Input::<String>::with_theme(&theme)
                .with_prompt("Destination folder")
                .allow_empty(true)
                .interact_text(),
        )?
        else {
            return Ok(None);
        };

        if raw.trim().is_empty() {
            theme::warn("Please enter a folder path (Ctrl+C to cancel).");
            continue;
        }
        return Ok(Some(expand_path(&raw)));
    }
}

/// Confirm before copying. `false` on decline or interrupt.
pub fn confirm_export(named: usize, total: usize, destination: &str) -> anyhow::Result<bool> {
    let answer = handle_interrupt(
        Confirm::with_theme(&shotlist_theme())
            .with_prompt(format!(
                "Copy {} of {} images to {}?",
                named, total, destination
            ))
            .default(true)
            .interact(),
    )?;
    Ok(answer.unwrap_or(false))
}

type PromptFn = dyn Fn() -> anyhow::Result<Option<PathBuf>> + Send + Sync;

/// Resolves the export destination by asking the user for a folder.
pub struct PromptDestination {
    interactive: bool,
    prompt: Arc<PromptFn>,
}

impl PromptDestination {
    pub fn new(interactive: bool) -> Self {
        Self {
            interactive,
            prompt: Arc::new(prompt_destination),
        }
    }
}

#[async_trait]
impl DestinationResolver for PromptDestination {
    async fn resolve(&self) -> shotlist_core::Result<Arc<dyn StorageHandle>> {
        if !self.interactive {
            return Err(ShotlistError::SelectionDeclined(
                "no destination folder given (pass --dest)".to_string(),
            ));
        }

        // The terminal read blocks, so it stays off the runtime's workers.
        let prompt = Arc::clone(&self.prompt);
        let answer = tokio::task::spawn_blocking(move || prompt()).await;

        let path = match answer {
            Ok(Ok(Some(path))) => path,
            Ok(Ok(None)) => {
                return Err(ShotlistError::SelectionDeclined(
                    "destination prompt cancelled".to_string(),
                ))
            }
            Ok(Err(e)) => return Err(ShotlistError::SelectionDeclined(e.to_string())),
            Err(e) => {
                return Err(ShotlistError::SelectionDeclined(format!(
                    "destination prompt failed: {}",
                    e
                )))
            }
        };

        let dir = LocalDirectory::create_dir(path)?;
        tracing::info!("Destination: {}", dir.root().display());
        Ok(Arc::new(dir))
    }
}
