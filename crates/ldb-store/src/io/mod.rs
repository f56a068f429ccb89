//! File I/O for language databases.
//!
//! This module handles:
//! - Reading database files
//! - Saving with atomic writes (temp file + rename)

mod load;
mod save;

pub use load::read_file;
pub use save::write_atomic;
