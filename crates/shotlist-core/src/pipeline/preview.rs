//! Embedded preview extraction from RAW containers.
//!
//! Nearly every RAW container carries at least one JPEG preview. Two places
//! are looked at:
//!
//! 1. The EXIF thumbnail IFD (`JPEGInterchangeFormat` + length), for
//!    TIFF-based containers that `kamadak-exif` can parse.
//! 2. A scan for embedded JPEG streams (SOI markers).
//!
//! Candidates whose header does not decode or whose short edge is below
//! [`MIN_PREVIEW_EDGE`] are dropped. The largest remaining one by pixel area
//! wins, with the IFD1 thumbnail kept on a tie.

use exif::{In, Reader, Tag};
use image::{ImageFormat, ImageReader};
use std::borrow::Cow;
use std::io::Cursor;

/// JPEG start-of-image marker followed by the first segment marker byte.
const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Stop scanning after this many candidates.
const MAX_CANDIDATES: usize = 16;

/// Ignore candidate previews smaller than this many pixels on the short edge.
const MIN_PREVIEW_EDGE: u32 = 64;

/// Extract the bytes of the largest usable embedded JPEG preview, if any.
pub fn extract_embedded_preview(bytes: &[u8]) -> Option<Cow<'_, [u8]>> {
    let thumbnail = exif_thumbnail(bytes)
        .and_then(|thumb| usable_area(&thumb).map(|area| (area, Cow::Owned(thumb))));
    let scanned = largest_scanned(bytes).map(|(area, slice)| (area, Cow::Borrowed(slice)));

    match (thumbnail, scanned) {
        (Some(thumb), Some(scan)) if scan.0 > thumb.0 => Some(scan.1),
        (Some(thumb), _) => Some(thumb.1),
        (None, scan) => scan.map(|(_, slice)| slice),
    }
}

/// The EXIF IFD1 thumbnail, located through the parsed TIFF structure.
pub fn exif_thumbnail(bytes: &[u8]) -> Option<Vec<u8>> {
    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    let offset = exif
        .get_field(Tag::JPEGInterchangeFormat, In::THUMBNAIL)?
        .value
        .get_uint(0)? as usize;
    let length = exif
        .get_field(Tag::JPEGInterchangeFormatLength, In::THUMBNAIL)?
        .value
        .get_uint(0)? as usize;

    // Offsets are relative to the TIFF header, which is where the parsed
    // buffer starts.
    let thumb = exif.buf().get(offset..offset.checked_add(length)?)?;
    if !thumb.starts_with(&JPEG_SOI[..2]) {
        return None;
    }
    Some(thumb.to_vec())
}

/// The largest embedded JPEG stream found by scanning for SOI markers.
pub fn scan_largest_jpeg(bytes: &[u8]) -> Option<&[u8]> {
    largest_scanned(bytes).map(|(_, slice)| slice)
}

fn largest_scanned(bytes: &[u8]) -> Option<(u64, &[u8])> {
    let mut best: Option<(u64, &[u8])> = None;
    let mut from = 0;
    let mut seen = 0;

    while seen < MAX_CANDIDATES {
        let Some(pos) = find(&bytes[from..], &JPEG_SOI) else {
            break;
        };
        let start = from + pos;
        seen += 1;
        from = start + JPEG_SOI.len();

        // The decoder stops at the stream's own EOI, so trailing data is fine.
        let candidate = &bytes[start..];
        let Some(area) = usable_area(candidate) else {
            continue;
        };
        if best.map_or(true, |(best_area, _)| area > best_area) {
            best = Some((area, candidate));
        }
    }

    best
}

/// Pixel area of a JPEG stream whose header decodes and whose short edge is
/// at least [`MIN_PREVIEW_EDGE`].
fn usable_area(jpeg: &[u8]) -> Option<u64> {
    let (width, height) = ImageReader::with_format(Cursor::new(jpeg), ImageFormat::Jpeg)
        .into_dimensions()
        .ok()?;
    if width.min(height) < MIN_PREVIEW_EDGE {
        return None;
    }
    Some(u64::from(width) * u64::from(height))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
