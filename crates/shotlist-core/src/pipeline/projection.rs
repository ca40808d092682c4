//! Name projection: derive each asset's target file name from the dataset row
//! at the same ordinal position.

use crate::dataset::TabularDataset;
use crate::types::{extension_of, Asset};

/// Extension used when the original name has none.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Assign `target_name` to every asset from `column` of `dataset`.
///
/// Asset `i` takes row `i`. Assets without a row, or whose cell is empty, get
/// no target name; so does every asset when no column is selected or the
/// dataset is empty. Running it twice gives the same result.
pub fn project_names(
    assets: &mut [Asset],
    dataset: Option<&TabularDataset>,
    column: Option<&str>,
) {
    let source = match (dataset, column) {
        (Some(dataset), Some(column)) if !dataset.is_empty() => Some((dataset, column)),
        _ => None,
    };

    for (row, asset) in assets.iter_mut().enumerate() {
        asset.target_name = source
            .and_then(|(dataset, column)| dataset.value(row, column))
            .filter(|stem| !stem.is_empty())
            .map(|stem| target_file_name(stem, &asset.original_name));
    }
}

/// `<stem>.<ext>`, where `ext` is the original name's extension lower-cased.
pub fn target_file_name(stem: &str, original_name: &str) -> String {
    let ext = extension_of(original_name);
    format!("{}.{}", stem, ext.as_deref().unwrap_or(DEFAULT_EXTENSION))
}
