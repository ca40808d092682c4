//! Delimited-text dataset loader.

use super::{DatasetLoader, TabularDataset};
use crate::config::DatasetConfig;
use crate::error::DatasetError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Loads CSV (or any single-byte-delimited) text with a header row.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    delimiter: u8,
    trim: bool,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

impl CsvLoader {
    pub fn new(config: &DatasetConfig) -> Self {
        Self {
            delimiter: config.delimiter_byte().unwrap_or(b','),
            trim: config.trim,
        }
    }
}

impl DatasetLoader for CsvLoader {
    fn load(&self, bytes: &[u8]) -> Result<TabularDataset, DatasetError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(if self.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .from_reader(bytes);

        let fields: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if fields.iter().all(String::is_empty) {
            return Err(DatasetError::MissingHeader);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            // Delimiter-only rows keep their position; blank lines never reach here.
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        tracing::debug!("Parsed {} records with fields {:?}", rows.len(), fields);
        TabularDataset::new(fields, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_basic_csv() {
        let csv = "name,scene\nAlpha,1\nBeta,2\n";
        let dataset = CsvLoader::default().load(csv.as_bytes()).unwrap();
        assert_eq!(dataset.fields(), &["name".to_string(), "scene".to_string()]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.value(1, "name"), Some("Beta"));
    }

    #[test]
    fn test_load_skips_blank_lines_and_strips_bom() {
        let csv = "\u{FEFF}name,scene\n\nAlpha,1\n\nBeta,2\n";
        let dataset = CsvLoader::default().load(csv.as_bytes()).unwrap();
        assert_eq!(dataset.fields()[0], "name");
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.value(1, "name"), Some("Beta"));
    }

    #[test]
    fn test_load_keeps_rows_of_empty_cells_in_place() {
        let csv = "name,scene\nAlpha,1\n,\nGamma,3\n";
        let dataset = CsvLoader::default().load(csv.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.value(1, "name"), Some(""));
        assert_eq!(dataset.value(2, "name"), Some("Gamma"));
    }

    #[test]
    fn test_load_trims_when_configured() {
        let csv = " name , scene \n  Alpha  , 1 \n";
        let dataset = CsvLoader::default().load(csv.as_bytes()).unwrap();
        assert_eq!(dataset.value(0, "name"), Some("Alpha"));

        let config = DatasetConfig {
            delimiter: ",".to_string(),
            trim: false,
        };
        let dataset = CsvLoader::new(&config).load(csv.as_bytes()).unwrap();
        assert_eq!(dataset.value(0, " name "), Some("  Alpha  "));
    }

    #[test]
    fn test_load_semicolon_delimiter_and_quotes() {
        let config = DatasetConfig {
            delimiter: ";".to_string(),
            trim: true,
        };
        let csv = "name;note\n\"Smith; J.\";ok\n";
        let dataset = CsvLoader::new(&config).load(csv.as_bytes()).unwrap();
        assert_eq!(dataset.value(0, "name"), Some("Smith; J."));
    }

    #[test]
    fn test_load_short_rows_are_padded() {
        let csv = "name,scene\nAlpha\n";
        let dataset = CsvLoader::default().load(csv.as_bytes()).unwrap();
        assert_eq!(dataset.value(0, "scene"), Some(""));
    }

    #[test]
    fn test_load_empty_input_has_no_header() {
        let err = CsvLoader::default().load(b"").unwrap_err();
        assert!(matches!(err, DatasetError::MissingHeader));
    }

    #[test]
    fn test_load_header_only_is_empty_dataset() {
        let dataset = CsvLoader::default().load(b"name,scene\n").unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.has_field("scene"));
    }
}
