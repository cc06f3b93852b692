//! Idempotent file copy
//!
//! A file already present at the destination is a normal skip outcome,
//! never compared or overwritten.

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Outcome of a copy attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// File bytes were transferred and flushed
    Copied,
    /// Destination already existed, nothing was written
    Skipped,
}

const COPY_BUFFER_SIZE: usize = 256 * 1024;

/// Copy a file into `dest_dir`, creating the directory chain as needed
///
/// Keeps the source base name. A failed transfer leaves any partial
/// destination file in place; there is no rollback.
pub fn copy(src: &Path, dest_dir: &Path) -> Result<CopyOutcome> {
    fs::create_dir_all(dest_dir).map_err(|e| Error::FileAccess {
        path: dest_dir.to_path_buf(),
        source: e,
    })?;

    let filename = src.file_name().ok_or_else(|| Error::Copy {
        path: src.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "source path has no file name",
        ),
    })?;
    let dest_path = dest_dir.join(filename);

    if dest_path.exists() {
        info!(dest = %dest_path.display(), "Destination exists, skipping");
        return Ok(CopyOutcome::Skipped);
    }

    copy_bytes(src, &dest_path).map_err(|e| Error::Copy {
        path: src.to_path_buf(),
        source: e,
    })?;

    debug!(src = %src.display(), dest = %dest_path.display(), "Copied file");
    Ok(CopyOutcome::Copied)
}

/// Buffered stream copy with a durable flush before returning
fn copy_bytes(src: &Path, dest: &Path) -> std::io::Result<()> {
    let src_file = File::open(src)?;
    let dest_file = File::create(dest)?;

    let mut reader = BufReader::with_capacity(COPY_BUFFER_SIZE, src_file);
    let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, dest_file);

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buffer[..bytes_read])?;
    }

    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}
