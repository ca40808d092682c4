//! Prompt theme for shotlist's interactive questions.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// A `ColorfulTheme` that renders on stderr, leaving stdout to listings.
pub fn shotlist_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().yellow(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        active_item_prefix: style("▸".to_string()).for_stderr().yellow(),
        active_item_style: Style::new().for_stderr().yellow(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}

/// Print a dimmed note under the last prompt.
pub fn note(message: impl std::fmt::Display) {
    eprintln!("  {}", Style::new().for_stderr().dim().apply_to(message));
}

/// Print a warning under the last prompt.
pub fn warn(message: impl std::fmt::Display) {
    eprintln!("  {}", Style::new().for_stderr().yellow().apply_to(message));
}
