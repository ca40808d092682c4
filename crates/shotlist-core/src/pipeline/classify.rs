//! Format classification of candidate entries.
//!
//! Two signals are combined: the declared content type and the file
//! extension. An entry is RAW if either signal says RAW, and supported if
//! either says standard-or-RAW. The extension wins whenever the content type
//! is missing or generic, which is the normal case for RAW files.

use crate::types::{extension_of, FormatClass};

/// Content types of standard raster images.
pub const STANDARD_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/bmp",
    "image/tiff",
    "image/heic",
    "image/heif",
    "image/avif",
];

/// Content types that identify camera RAW containers.
pub const RAW_TYPES: &[&str] = &[
    "image/x-canon-cr2",
    "image/x-canon-cr3",
    "image/x-canon-crw",
    "image/x-nikon-nef",
    "image/x-nikon-nrw",
    "image/x-sony-arw",
    "image/x-sony-sr2",
    "image/x-sony-srf",
    "image/x-adobe-dng",
    "image/x-fuji-raf",
    "image/x-olympus-orf",
    "image/x-panasonic-rw2",
    "image/x-panasonic-raw",
    "image/x-pentax-pef",
    "image/x-samsung-srw",
    "image/x-sigma-x3f",
    "image/x-kodak-dcr",
    "image/x-kodak-kdc",
    "image/x-hasselblad-3fr",
    "image/x-leica-rwl",
    "image/x-minolta-mrw",
    "image/x-epson-erf",
    "image/x-phaseone-iiq",
    "image/x-dcraw",
];

/// File extensions of camera RAW containers (lower case).
pub const RAW_EXTENSIONS: &[&str] = &[
    "cr2", "cr3", "crw", "nef", "nrw", "arw", "srf", "sr2", "dng", "raf", "orf", "rw2", "raw",
    "pef", "ptx", "srw", "x3f", "dcr", "kdc", "3fr", "fff", "mef", "mrw", "erf", "iiq", "rwl",
    "mos", "gpr",
];

/// Classify an entry from its declared content type and file name.
pub fn classify(content_type: Option<&str>, file_name: &str) -> FormatClass {
    let essence = content_type.map(essence);
    let type_standard = essence
        .as_deref()
        .is_some_and(|t| STANDARD_TYPES.contains(&t));
    let type_raw = essence.as_deref().is_some_and(|t| RAW_TYPES.contains(&t));
    let ext_raw = extension_of(file_name).is_some_and(|ext| RAW_EXTENSIONS.contains(&ext.as_str()));

    if type_raw || ext_raw {
        FormatClass::Raw
    } else if type_standard {
        FormatClass::Standard
    } else {
        FormatClass::Unsupported
    }
}

/// Lower-cased media type with any parameters removed.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_extension_without_type() {
        let class = classify(None, "IMG_0001.cr2");
        assert!(class.is_supported());
        assert!(class.is_raw());
    }

    #[test]
    fn test_png_type_is_standard() {
        let class = classify(Some("image/png"), "shot.png");
        assert!(class.is_supported());
        assert!(!class.is_raw());
    }

    #[test]
    fn test_text_file_is_unsupported() {
        let class = classify(None, "notes.txt");
        assert!(!class.is_supported());
        assert!(!class.is_raw());

        let class = classify(Some("text/plain"), "notes.txt");
        assert_eq!(class, FormatClass::Unsupported);
    }

    #[test]
    fn test_raw_extension_with_generic_type() {
        assert_eq!(
            classify(Some("application/octet-stream"), "DSC_0042.NEF"),
            FormatClass::Raw
        );
        assert_eq!(classify(Some(""), "a.ARW"), FormatClass::Raw);
    }

    #[test]
    fn test_raw_type_without_extension() {
        assert_eq!(classify(Some("image/x-canon-cr2"), "IMG_0001"), FormatClass::Raw);
    }

    #[test]
    fn test_raw_extension_overrides_standard_type() {
        // DNG files are often declared as TIFF.
        assert_eq!(classify(Some("image/tiff"), "frame.dng"), FormatClass::Raw);
    }

    #[test]
    fn test_content_type_is_normalized() {
        assert_eq!(
            classify(Some("Image/JPEG; charset=binary"), "a.jpg"),
            FormatClass::Standard
        );
    }

    #[test]
    fn test_standard_extension_needs_a_type() {
        // Only the RAW extension set is used as a fallback signal.
        assert_eq!(classify(None, "a.jpg"), FormatClass::Unsupported);
    }
}
