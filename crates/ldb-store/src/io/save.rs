//! Atomic file replacement.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{DatabaseError, Result};

/// Write `bytes` to `path` through a temp file that is renamed into place.
///
/// The previous file, if any, is untouched until the rename. The temp file
/// is removed again when any step fails.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    write_atomic_with(path, |file| file.write_all(bytes))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}

fn write_atomic_with<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let temp_path = temp_path_for(path);

    // Create parent directory if needed
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| DatabaseError::io("create directory", parent, e))?;
    }

    let mut file =
        File::create(&temp_path).map_err(|e| DatabaseError::io("create", &temp_path, e))?;
    let written = fill(&mut file)
        .map_err(|e| DatabaseError::io("write", &temp_path, e))
        .and_then(|()| {
            file.sync_all()
                .map_err(|e| DatabaseError::io("sync", &temp_path, e))
        });
    drop(file);
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        DatabaseError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source: e,
        }
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("database"));
    name.push(".tmp");
    path.with_file_name(name)
}
