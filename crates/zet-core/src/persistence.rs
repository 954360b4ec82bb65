//! Note file persistence
//!
//! Notes are plain files; reading is a whole-file read and writing goes
//! through [`atomic_write`] so a note is never left partially written.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{IoOp, Result, ZetError};

/// Read a note file as UTF-8 text
pub fn read_note(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| ZetError::from_io(e, path.to_path_buf(), IoOp::Read))
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Persist (rename) the temp file over the target path
///
/// If any step fails the temp file is removed when it goes out of scope and
/// the target is left as it was.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(parent)
        .map_err(|e| ZetError::from_io(e, parent.to_path_buf(), IoOp::Write))?;

    // Same directory as the target so the rename stays on one filesystem
    let mut file = NamedTempFile::new_in(parent)
        .map_err(|e| ZetError::from_io(e, parent.to_path_buf(), IoOp::Write))?;

    file.write_all(data)
        .map_err(|e| ZetError::from_io(e, file.path().to_path_buf(), IoOp::Write))?;

    file.as_file()
        .sync_all()
        .map_err(|e| ZetError::from_io(e, file.path().to_path_buf(), IoOp::Write))?;

    file.persist(path)
        .map_err(|e| ZetError::AtomicWriteFailed {
            path: path.to_path_buf(),
            source: e.error,
        })?;

    Ok(())
}
