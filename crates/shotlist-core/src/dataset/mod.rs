//! Tabular datasets: the rows whose ordinal position names each asset.
//!
//! The dataset is immutable once loaded and replaced wholesale on re-load.
//! Parsing raw bytes into rows is the job of a [`DatasetLoader`];
//! [`csv::CsvLoader`] is the bundled implementation.

pub mod csv;

pub use self::csv::CsvLoader;

use crate::error::DatasetError;

/// Turns raw bytes into a [`TabularDataset`].
pub trait DatasetLoader: Send + Sync {
    fn load(&self, bytes: &[u8]) -> Result<TabularDataset, DatasetError>;
}

/// Ordered rows sharing one header-derived field set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularDataset {
    fields: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TabularDataset {
    /// Build a dataset, normalizing every row to the header's width.
    ///
    /// Short rows are padded with empty cells and extra cells are dropped.
    pub fn new(fields: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, DatasetError> {
        if fields.is_empty() {
            return Err(DatasetError::MissingHeader);
        }
        for (i, field) in fields.iter().enumerate() {
            if field.is_empty() || fields[..i].contains(field) {
                return Err(DatasetError::InvalidHeader(field.clone()));
            }
        }
        let width = fields.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Ok(Self { fields, rows })
    }

    /// Field names, in header order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at record `row`, field `field`. `None` if either is absent.
    pub fn value(&self, row: usize, field: &str) -> Option<&str> {
        let column = self.fields.iter().position(|f| f == field)?;
        self.rows.get(row).map(|r| r[column].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rows_are_normalized_to_header_width() {
        let dataset = TabularDataset::new(
            strings(&["name", "scene"]),
            vec![strings(&["Alpha"]), strings(&["Beta", "2", "extra"])],
        )
        .unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.value(0, "name"), Some("Alpha"));
        assert_eq!(dataset.value(0, "scene"), Some(""));
        assert_eq!(dataset.value(1, "scene"), Some("2"));
        assert_eq!(dataset.value(2, "name"), None);
        assert_eq!(dataset.value(0, "missing"), None);
    }

    #[test]
    fn test_rejects_empty_and_duplicate_fields() {
        assert!(matches!(
            TabularDataset::new(vec![], vec![]),
            Err(DatasetError::MissingHeader)
        ));
        assert!(matches!(
            TabularDataset::new(strings(&["a", ""]), vec![]),
            Err(DatasetError::InvalidHeader(_))
        ));
        assert!(matches!(
            TabularDataset::new(strings(&["a", "a"]), vec![]),
            Err(DatasetError::InvalidHeader(f)) if f == "a"
        ));
    }
}
