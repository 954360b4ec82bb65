//! Directory ingestion
//!
//! Finds note files below a directory and reads them into [`Note`]s. A file
//! that cannot be read is skipped and reported; a failing directory walk
//! aborts the load.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::error::{Result, ZetError};
use crate::note::Note;

/// Outcome of [`load`]
#[derive(Debug, Default)]
pub struct LoadReport {
    pub notes: Vec<Note>,
    /// Files that were found but could not be read
    pub skipped: Vec<(PathBuf, ZetError)>,
}

/// All note files below `dir`, sorted by path
///
/// Directories named in `config.excluded_dirs` are not descended into.
pub fn scan(dir: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    let walker = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, config));

    for entry in walker {
        let entry = entry.map_err(|e| ZetError::Scan {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf()),
            source: e,
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), &config.extension) {
            paths.push(entry.into_path());
        }
    }

    paths.sort();
    debug!("Found {} note files in {:?}", paths.len(), dir);
    Ok(paths)
}

/// Scan `dir` and read every note file found
pub fn load(dir: &Path, config: &Config) -> Result<LoadReport> {
    let mut report = LoadReport::default();

    for path in scan(dir, config)? {
        match Note::from_path(&path) {
            Ok(note) => report.notes.push(note),
            Err(e) => {
                warn!("Skipping {:?}: {}", path, e);
                report.skipped.push((path, e));
            }
        }
    }

    Ok(report)
}

fn is_excluded(entry: &DirEntry, config: &Config) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && config
            .excluded_dirs
            .iter()
            .any(|name| entry.file_name() == name.as_str())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}
