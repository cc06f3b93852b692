//! Destination path derivation
//!
//! Pure mapping from (timestamp, media kind) to a destination
//! subdirectory. No I/O happens here.

use crate::config::DateGranularity;
use chrono::{Datelike, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Top-level bucket name for a media kind
pub fn category_name(is_video: bool) -> &'static str {
    if is_video { "Videos" } else { "Photos" }
}

/// Derive the destination directory for a file
///
/// Layout is `<dest_root>/<Photos|Videos>/<YYYY>/<MM>` with an extra
/// zero-padded day segment when day granularity is configured. The file
/// keeps its original base name, so two files shot in the same month
/// land in the same directory.
pub fn plan(
    timestamp: &NaiveDateTime,
    is_video: bool,
    dest_root: &Path,
    granularity: DateGranularity,
) -> PathBuf {
    let mut dest = dest_root.join(category_name(is_video));
    dest.push(format!("{}", timestamp.year()));
    dest.push(format!("{:02}", timestamp.month()));
    if granularity == DateGranularity::Day {
        dest.push(format!("{:02}", timestamp.day()));
    }
    dest
}
