//! Terminal rendering of pipeline status: a progress bar while a phase runs
//! and a summary table when the run ends.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use shotlist_core::{ExportOutcome, IngestSummary, StatusBoard};
use tokio::task::JoinHandle;

/// Mirrors a [`StatusBoard`] onto a progress bar until dropped or finished.
pub struct StatusProgress {
    bar: ProgressBar,
    task: JoinHandle<()>,
}

impl StatusProgress {
    /// Start following `board`. The bar is hidden when `visible` is false.
    pub fn follow(board: &StatusBoard, visible: bool) -> Self {
        let bar = create_progress_bar(visible);
        let mut rx = board.subscribe();
        let follower = bar.clone();

        let task = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let snapshot = rx.borrow_and_update().clone();
                if let Some((done, total)) = snapshot.progress {
                    follower.set_length(total as u64);
                    follower.set_position(done as u64);
                }
                follower.set_message(snapshot.message);
            }
        });

        Self { bar, task }
    }

    /// Stop following and remove the bar.
    pub fn finish(self) {
        self.task.abort();
        self.bar.finish_and_clear();
    }
}

fn create_progress_bar(visible: bool) -> ProgressBar {
    let bar = ProgressBar::new(0);
    if !visible {
        bar.set_draw_target(ProgressDrawTarget::hidden());
        return bar;
    }
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    bar.set_style(style);
    bar.set_draw_target(ProgressDrawTarget::stderr());
    bar
}

/// Print the end-of-run summary table to stderr.
pub fn print_summary(
    summary: &IngestSummary,
    outcome: Option<&ExportOutcome>,
    elapsed: std::time::Duration,
) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Images:       {:>8}", summary.assets);
    if summary.has_raw() {
        eprintln!("    RAW:          {:>8}", summary.raw);
    }
    if summary.skipped > 0 {
        eprintln!("    Skipped:      {:>8}", summary.skipped);
    }
    if let Some(outcome) = outcome {
        eprintln!("  ------------------------------------");
        eprintln!("    Copied:       {:>8}", outcome.succeeded);
        if outcome.failed > 0 {
            eprintln!("    Errors:       {:>8}", outcome.failed);
        }
        if outcome.cancelled {
            eprintln!("    Cancelled after {}", outcome.last_attempted.as_deref().unwrap_or("start"));
        }
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("  ====================================");
}
