//! Source tree traversal
//!
//! The tree is walked twice: a counting pass so the progress total is
//! known up front, then a streaming pass that feeds eligible paths into
//! the bounded work queue. Both passes prune skip-set directories by
//! base name and abort on any traversal error.

use crate::config::Config;
use crate::error::Result;
use crossbeam_channel::Sender;
use std::path::PathBuf;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Check whether a traversal entry should be descended into or yielded
fn keep_entry(entry: &DirEntry, config: &Config) -> bool {
    if entry.file_type().is_dir()
        && let Some(name) = entry.file_name().to_str()
        && config.should_skip_dir(name)
    {
        debug!(path = %entry.path().display(), "Pruning skipped directory");
        return false;
    }
    true
}

/// Check whether an entry is an eligible media file
///
/// A bare dotfile like ".jpg" has no extension and is not eligible;
/// hidden files are not treated as media.
fn is_eligible(entry: &DirEntry, config: &Config) -> bool {
    entry.file_type().is_file()
        && entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| config.is_media(ext))
            .unwrap_or(false)
}

/// Count eligible files under the source root
///
/// The result is the fixed progress total for the run; it matches what
/// [`stream`] will enqueue as long as nothing else mutates the tree.
pub fn count(config: &Config) -> Result<usize> {
    let mut total = 0;
    for entry in WalkDir::new(&config.source_dir)
        .into_iter()
        .filter_entry(|e| keep_entry(e, config))
    {
        let entry = entry?;
        if is_eligible(&entry, config) {
            total += 1;
        }
    }
    Ok(total)
}

/// Stream eligible file paths into the work queue
///
/// Blocks on the bounded sender when workers fall behind. Traversal
/// errors propagate and abort the run; a disconnected queue (all
/// receivers gone) ends the stream quietly.
pub fn stream(config: &Config, tx: &Sender<PathBuf>) -> Result<()> {
    for entry in WalkDir::new(&config.source_dir)
        .into_iter()
        .filter_entry(|e| keep_entry(e, config))
    {
        let entry = entry?;
        if is_eligible(&entry, config) && tx.send(entry.path().to_path_buf()).is_err() {
            debug!("Work queue disconnected, stopping traversal");
            return Ok(());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;

    fn fixture() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.jpg"), b"a").unwrap();
        fs::write(root.join("b.MOV"), b"b").unwrap();
        fs::write(root.join("notes.txt"), b"n").unwrap();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("sub/c.png"), b"c").unwrap();
        fs::create_dir_all(root.join("@eaDir/deep")).unwrap();
        fs::write(root.join("@eaDir/d.jpg"), b"d").unwrap();
        fs::write(root.join("@eaDir/deep/e.jpg"), b"e").unwrap();

        let config = Config {
            source_dir: root.to_path_buf(),
            ..Config::default()
        };
        (dir, config)
    }

    #[test]
    fn test_count_excludes_skipped_and_ineligible() {
        let (_dir, config) = fixture();
        // a.jpg, b.MOV, sub/c.png; nothing under @eaDir, no notes.txt
        assert_eq!(count(&config).unwrap(), 3);
    }

    #[test]
    fn test_stream_matches_count() {
        let (_dir, config) = fixture();
        let total = count(&config).unwrap();

        let (tx, rx) = crossbeam_channel::bounded(config.queue_depth);
        stream(&config, &tx).unwrap();
        drop(tx);

        let streamed: HashSet<PathBuf> = rx.into_iter().collect();
        assert_eq!(streamed.len(), total);
        assert!(streamed.iter().all(|p| !p.to_string_lossy().contains("@eaDir")));
    }

    #[test]
    fn test_dotfile_without_stem_is_ineligible() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.jpg"), b"a").unwrap();
        fs::write(dir.path().join(".jpg"), b"hidden").unwrap();

        let config = Config {
            source_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        assert_eq!(count(&config).unwrap(), 1);
    }

    #[test]
    fn test_missing_root_aborts() {
        let config = Config {
            source_dir: PathBuf::from("/nonexistent/source"),
            ..Config::default()
        };
        assert!(count(&config).is_err());
    }
}
