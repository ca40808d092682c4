//! Capture-time extraction from EXIF metadata.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use exif::{Exif, In, Reader, Tag, Value};
use std::io::Cursor;

use crate::types::{CaptureSource, CaptureTime};

/// Extracts capture timestamps from image bytes.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Best-available capture time for an asset. Never fails.
    ///
    /// Prefers EXIF DateTimeOriginal, then DateTimeDigitized. Falls back to
    /// the storage entry's modification time (`UNIX_EPOCH` when the storage
    /// layer reported none).
    pub fn capture_time(bytes: &[u8], modified: Option<DateTime<Utc>>) -> CaptureTime {
        let fallback =
            CaptureTime::from_modified(modified.unwrap_or(DateTime::<Utc>::UNIX_EPOCH));

        let exif = match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => {
                tracing::trace!("No EXIF data, using modification time");
                return fallback;
            }
            Err(e) => {
                tracing::warn!("EXIF unreadable ({}), using modification time", e);
                return fallback;
            }
        };

        let candidates = [
            (
                Tag::DateTimeOriginal,
                Tag::OffsetTimeOriginal,
                CaptureSource::ExifOriginal,
            ),
            (
                Tag::DateTimeDigitized,
                Tag::OffsetTimeDigitized,
                CaptureSource::ExifDigitized,
            ),
        ];

        for (tag, offset_tag, source) in candidates {
            let Some(field) = exif.get_field(tag, In::PRIMARY) else {
                continue;
            };
            match Self::parse_field(&exif, &field.value, offset_tag) {
                Some(at) => return CaptureTime { at, source },
                None => tracing::warn!(
                    "Unparseable {} value {}, trying next source",
                    tag,
                    field.display_value()
                ),
            }
        }

        fallback
    }

    fn parse_field(exif: &Exif, value: &Value, offset_tag: Tag) -> Option<DateTime<Utc>> {
        let ascii = Self::first_ascii(value)?;
        let offset = exif
            .get_field(offset_tag, In::PRIMARY)
            .and_then(|f| Self::first_ascii(&f.value))
            .and_then(parse_offset);
        parse_exif_datetime(ascii, offset)
    }

    fn first_ascii(value: &Value) -> Option<&[u8]> {
        match value {
            Value::Ascii(values) => values.first().map(Vec::as_slice),
            _ => None,
        }
    }
}

/// Parse an EXIF `YYYY:MM:DD HH:MM:SS` timestamp.
///
/// The value is local time; with an offset it is converted to UTC, without
/// one it is taken as UTC.
pub fn parse_exif_datetime(ascii: &[u8], offset: Option<FixedOffset>) -> Option<DateTime<Utc>> {
    let dt = exif::DateTime::from_ascii(ascii).ok()?;
    let naive = NaiveDate::from_ymd_opt(dt.year.into(), dt.month.into(), dt.day.into())?
        .and_hms_opt(dt.hour.into(), dt.minute.into(), dt.second.into())?;
    match offset {
        Some(offset) => offset
            .from_local_datetime(&naive)
            .single()
            .map(|local| local.with_timezone(&Utc)),
        None => Some(Utc.from_utc_datetime(&naive)),
    }
}

/// Parse an EXIF offset string such as `+09:00` or `-05:30`.
fn parse_offset(ascii: &[u8]) -> Option<FixedOffset> {
    let s = std::str::from_utf8(ascii).ok()?.trim();
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours = hours.parse::<i32>().ok().filter(|h| (0..=23).contains(h))?;
    let minutes = minutes.parse::<i32>().ok().filter(|m| (0..=59).contains(m))?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
