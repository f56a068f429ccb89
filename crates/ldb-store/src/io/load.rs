//! Reading database files.

use std::fs;
use std::path::Path;

use crate::error::{DatabaseError, Result};

/// Read the raw bytes of a database file.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| DatabaseError::io("read", path, e))
}
