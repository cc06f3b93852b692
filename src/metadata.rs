//! Capture-time and media-kind resolution
//!
//! Images get their timestamp from EXIF metadata when present; videos
//! and anything without usable EXIF fall back to the file system
//! modification time.

use crate::config::Config;
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, trace};

/// Resolved metadata for a single media file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    /// Capture timestamp (EXIF or file system fallback)
    pub timestamp: NaiveDateTime,
    /// Whether the file is a video
    pub is_video: bool,
}

/// EXIF tags to try for date extraction, in priority order
const DATE_TAGS: &[Tag] = &[
    Tag::DateTimeOriginal,
    Tag::DateTimeDigitized,
    Tag::DateTime,
];

/// Resolve the capture timestamp and media kind of a file
///
/// Only fails when the file itself cannot be stat'ed; absent or
/// malformed EXIF data silently degrades to the modification time.
pub fn resolve(path: &Path, config: &Config) -> Result<FileMetadata> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    if config.is_video(ext) {
        return Ok(FileMetadata {
            timestamp: modified_time(path)?,
            is_video: true,
        });
    }

    if config.is_image(ext) {
        if let Some(timestamp) = read_exif_time(path) {
            trace!(?path, %timestamp, "Extracted time from EXIF");
            return Ok(FileMetadata {
                timestamp,
                is_video: false,
            });
        }
        debug!(?path, "No usable EXIF time, falling back to modification time");
    }

    Ok(FileMetadata {
        timestamp: modified_time(path)?,
        is_video: false,
    })
}

/// File system modification time as a naive UTC timestamp
fn modified_time(path: &Path) -> Result<NaiveDateTime> {
    let metadata = std::fs::metadata(path).map_err(|e| Error::Metadata {
        path: path.to_path_buf(),
        source: e,
    })?;
    let modified = metadata.modified().map_err(|e| Error::Metadata {
        path: path.to_path_buf(),
        source: e,
    })?;
    let datetime: chrono::DateTime<chrono::Utc> = modified.into();
    Ok(datetime.naive_utc())
}

/// Try to read a capture time from EXIF metadata
///
/// Returns `None` for any read or parse failure so the caller can fall
/// back without treating this as an error.
fn read_exif_time(path: &Path) -> Option<NaiveDateTime> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);

    let exif = Reader::new().read_from_container(&mut reader).ok()?;

    for tag in DATE_TAGS {
        if let Some(field) = exif.get_field(*tag, In::PRIMARY)
            && let Some(datetime) = parse_exif_datetime(&field.display_value().to_string())
        {
            trace!(?path, ?tag, "Found EXIF date");
            return Some(datetime);
        }
    }

    None
}

/// Parse EXIF datetime string format: "YYYY:MM:DD HH:MM:SS"
fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim().trim_matches('"');

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S") {
        return Some(dt);
    }

    // Subsecond variant
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S%.f") {
        return Some(dt);
    }

    // Formats some cameras write instead of the standard one
    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
    ];

    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Datelike, NaiveDate, Utc};
    use std::time::{Duration, UNIX_EPOCH};

    /// Write a minimal EXIF blob (TIFF container) carrying one
    /// DateTimeOriginal tag; the reader sniffs the container by magic,
    /// not by file name.
    fn write_exif_fixture(path: &Path, datetime: &str) {
        use exif::Value;
        use exif::experimental::Writer;

        let field = exif::Field {
            tag: Tag::DateTimeOriginal,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![datetime.as_bytes().to_vec()]),
        };
        let mut writer = Writer::new();
        writer.push_field(&field);
        let mut buf = std::io::Cursor::new(Vec::new());
        writer.write(&mut buf, false).unwrap();
        std::fs::write(path, buf.into_inner()).unwrap();
    }

    #[test]
    fn test_resolve_image_prefers_exif_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.jpg");
        write_exif_fixture(&path, "2023:06:15 10:30:00");

        // Point the mtime somewhere else entirely so a fallback would
        // produce a different timestamp
        let mtime = UNIX_EPOCH + Duration::from_secs(1_641_081_600); // 2022-01-02
        filetime::set_file_mtime(&path, filetime::FileTime::from_system_time(mtime)).unwrap();

        let config = Config::default();
        let meta = resolve(&path, &config).unwrap();

        assert!(!meta.is_video);
        let expected = NaiveDate::from_ymd_opt(2023, 6, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(meta.timestamp, expected);
    }

    #[test]
    fn test_parse_exif_datetime() {
        let dt = parse_exif_datetime("2024:01:15 14:30:00").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);

        // With quotes, as display_value sometimes renders
        let dt = parse_exif_datetime("\"2024:01:15 14:30:00\"").unwrap();
        assert_eq!(dt.year(), 2024);

        // Alternative separator
        let dt = parse_exif_datetime("2024-01-15 14:30:00").unwrap();
        assert_eq!(dt.year(), 2024);

        assert!(parse_exif_datetime("invalid").is_none());
        assert!(parse_exif_datetime("").is_none());
    }

    #[test]
    fn test_resolve_video_uses_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.MOV");
        std::fs::write(&path, b"not a real video").unwrap();

        let mtime = UNIX_EPOCH + Duration::from_secs(1_641_081_600); // 2022-01-02
        filetime::set_file_mtime(&path, filetime::FileTime::from_system_time(mtime)).unwrap();

        let config = Config::default();
        let meta = resolve(&path, &config).unwrap();

        assert!(meta.is_video);
        let expected: DateTime<Utc> = mtime.into();
        assert_eq!(meta.timestamp, expected.naive_utc());
    }

    #[test]
    fn test_resolve_image_without_exif_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.jpg");
        std::fs::write(&path, b"\xff\xd8\xff\xe0 garbage, no exif").unwrap();

        let mtime = UNIX_EPOCH + Duration::from_secs(1_686_787_200); // 2023-06-15
        filetime::set_file_mtime(&path, filetime::FileTime::from_system_time(mtime)).unwrap();

        let config = Config::default();
        let meta = resolve(&path, &config).unwrap();

        assert!(!meta.is_video);
        let expected: DateTime<Utc> = mtime.into();
        assert_eq!(meta.timestamp, expected.naive_utc());
    }

    #[test]
    fn test_resolve_missing_file_fails() {
        let config = Config::default();
        let err = resolve(Path::new("/nonexistent/a.jpg"), &config);
        assert!(matches!(err, Err(Error::Metadata { .. })));
    }
}
